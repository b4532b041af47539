// paw-measure/src/wizard/session.rs

//! Session state owned by the wizard

use derive_builder::Builder;
use std::fmt;
use std::path::PathBuf;

use super::measurement::{Calibration, Measurement, MeasurementKind, Measurements};
use super::step::{Step, ViewKind};
use crate::geometry::{Segment, SegmentDraft};

/// Calibration segments shorter than this many image pixels are rejected
pub const DEFAULT_MIN_CALIBRATION_PX: f64 = 1.0;

/// Tunables of the wizard
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct WizardConfig {
    #[builder(default = "DEFAULT_MIN_CALIBRATION_PX")]
    pub min_calibration_px: f64,
}

impl WizardConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.min_calibration_px {
            Some(px) if !px.is_finite() || px < 0.0 => Err(format!(
                "min_calibration_px must be a finite value >= 0, got {}",
                px
            )),
            _ => Ok(()),
        }
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            min_calibration_px: DEFAULT_MIN_CALIBRATION_PX,
        }
    }
}

/// Free-form metadata about the dog
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct DogInfo {
    pub breed: String,
    pub sex: String,
    pub age: String,
    pub weight: String,
    pub owner: String,
}

/// Editable fields of [`DogInfo`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DogField {
    Breed,
    Sex,
    Age,
    Weight,
    Owner,
}

impl DogField {
    pub const ALL: [DogField; 5] = [
        DogField::Breed,
        DogField::Sex,
        DogField::Age,
        DogField::Weight,
        DogField::Owner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DogField::Breed => "Breed",
            DogField::Sex => "Sex",
            DogField::Age => "Age",
            DogField::Weight => "Weight",
            DogField::Owner => "Owner",
        }
    }
}

impl DogInfo {
    pub fn get(&self, field: DogField) -> &str {
        match field {
            DogField::Breed => &self.breed,
            DogField::Sex => &self.sex,
            DogField::Age => &self.age,
            DogField::Weight => &self.weight,
            DogField::Owner => &self.owner,
        }
    }

    pub fn set(&mut self, field: DogField, value: String) {
        let slot = match field {
            DogField::Breed => &mut self.breed,
            DogField::Sex => &mut self.sex,
            DogField::Age => &mut self.age,
            DogField::Weight => &mut self.weight,
            DogField::Owner => &mut self.owner,
        };
        *slot = value;
    }
}

/// Dimensions of a decoded source image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Lifecycle of a view's source image
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ImageState {
    #[default]
    Absent,
    /// Uploaded, waiting for the decoder
    Decoding { source: PathBuf },
    Ready(ImageInfo),
    Failed { source: PathBuf, reason: String },
}

impl ImageState {
    pub fn ready(&self) -> Option<&ImageInfo> {
        match self {
            ImageState::Ready(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready().is_some()
    }
}

/// Per-view state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    pub image: ImageState,
    pub calibration: Option<Calibration>,
    pub confirmed: bool,
    /// Bumped on every upload so late decoder results can be told apart
    pub generation: u64,
}

/// The three views of a session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Views {
    pub bottom: View,
    pub side: View,
    pub front: View,
}

impl Views {
    pub fn get(&self, kind: ViewKind) -> &View {
        match kind {
            ViewKind::Bottom => &self.bottom,
            ViewKind::Side => &self.side,
            ViewKind::Front => &self.front,
        }
    }

    pub fn get_mut(&mut self, kind: ViewKind) -> &mut View {
        match kind {
            ViewKind::Bottom => &mut self.bottom,
            ViewKind::Side => &mut self.side,
            ViewKind::Front => &mut self.front,
        }
    }

    pub fn all_confirmed(&self) -> bool {
        ViewKind::ALL.iter().all(|kind| self.get(*kind).confirmed)
    }
}

/// Something the front-end should draw on top of the active image
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayItem {
    Measurement(Measurement),
    /// The segment currently being dragged
    Draft(Segment),
}

/// Everything the wizard knows about one measuring run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub config: WizardConfig,
    pub dog: DogInfo,
    pub step: Step,
    pub views: Views,
    pub measurements: Measurements,
    pub draft: Option<SegmentDraft>,
}

impl Session {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_dog(mut self, dog: DogInfo) -> Self {
        self.dog = dog;
        self
    }

    pub fn view(&self, kind: ViewKind) -> &View {
        self.views.get(kind)
    }

    /// View whose image is shown at the current step
    pub fn active_view(&self) -> Option<ViewKind> {
        self.step.view()
    }

    /// View that would receive an upload right now
    pub fn upload_target(&self) -> Option<ViewKind> {
        let view = self.step.view()?;
        if self.step == view.upload_step() || self.step == view.calibration_step() {
            Some(view)
        } else {
            None
        }
    }

    /// True when the current step takes segments and its image is decoded
    pub fn drawing_enabled(&self) -> bool {
        self.step
            .draw_target()
            .map(|target| self.view(target.view()).image.is_ready())
            .unwrap_or(false)
    }

    /// Items to draw over the active view's image
    pub fn overlay(&self) -> Vec<OverlayItem> {
        let mut items: Vec<OverlayItem> = match self.active_view() {
            Some(view) => self
                .measurements
                .for_view(view)
                .copied()
                .map(OverlayItem::Measurement)
                .collect(),
            None => Vec::new(),
        };
        if let Some(segment) = self.draft.as_ref().and_then(SegmentDraft::finish) {
            items.push(OverlayItem::Draft(segment));
        }
        items
    }

    /// The finished record, available only at the summary step
    pub fn final_record(&self) -> Option<FinalRecord> {
        if self.step != Step::Summary || !self.views.all_confirmed() {
            return None;
        }
        let cm = |kind: MeasurementKind| self.measurements.get(kind).map(|m| m.value_cm);
        Some(FinalRecord {
            dog: self.dog.clone(),
            length_cm: cm(MeasurementKind::Length)?,
            width_cm: cm(MeasurementKind::Width)?,
            height_cm: cm(MeasurementKind::Height)?,
            thickness_cm: cm(MeasurementKind::Thickness)?,
        })
    }
}

/// Output of a completed session
#[derive(Clone, Debug, PartialEq)]
pub struct FinalRecord {
    pub dog: DogInfo,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub thickness_cm: f64,
}

impl FinalRecord {
    pub fn value(&self, kind: MeasurementKind) -> f64 {
        match kind {
            MeasurementKind::Length => self.length_cm,
            MeasurementKind::Width => self.width_cm,
            MeasurementKind::Height => self.height_cm,
            MeasurementKind::Thickness => self.thickness_cm,
        }
    }
}

impl fmt::Display for FinalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in DogField::ALL {
            writeln!(f, "  {:<10} {}", format!("{}:", field.label()), self.dog.get(field))?;
        }
        for kind in MeasurementKind::ALL {
            writeln!(
                f,
                "  {:<10} {:.2} cm",
                format!("{}:", kind.label()),
                self.value(kind)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults_and_validation() {
        let config = WizardConfigBuilder::default().build().unwrap();
        assert_eq!(config, WizardConfig::default());

        let config = WizardConfigBuilder::default()
            .min_calibration_px(4.0)
            .build()
            .unwrap();
        assert_eq!(config.min_calibration_px, 4.0);

        assert!(WizardConfigBuilder::default()
            .min_calibration_px(-1.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_dog_info_builder() {
        let dog = DogInfoBuilder::default()
            .breed("Beagle")
            .owner("Sam")
            .build()
            .unwrap();
        assert_eq!(dog.get(DogField::Breed), "Beagle");
        assert_eq!(dog.get(DogField::Owner), "Sam");
        assert_eq!(dog.get(DogField::Age), "");
    }

    #[test]
    fn test_fresh_session() {
        let session = Session::default();
        assert_eq!(session.step, Step::DogInfo);
        assert!(session.upload_target().is_none());
        assert!(!session.drawing_enabled());
        assert!(session.overlay().is_empty());
        assert!(session.final_record().is_none());
        for view in ViewKind::ALL {
            assert_eq!(session.view(view), &View::default());
        }
    }

    #[test]
    fn test_upload_target_follows_step() {
        let mut session = Session::default();
        session.step = Step::BottomCalibrate;
        assert_eq!(session.upload_target(), Some(ViewKind::Bottom));
        session.step = Step::SideUpload;
        assert_eq!(session.upload_target(), Some(ViewKind::Side));
        session.step = Step::FrontCalibrate;
        assert_eq!(session.upload_target(), Some(ViewKind::Front));
        session.step = Step::SideHeight;
        assert!(session.upload_target().is_none());
    }
}
