// paw-measure/src/wizard/step.rs

//! The fixed step sequence and the per-view step table
//!
//! The wizard walks eleven named steps. Each photographed view owns a
//! contiguous run of them: an upload step, a calibration step, one or two
//! measurement steps, and a confirm exit into the next view.

use std::fmt;

use super::measurement::MeasurementKind;

/// One of the three photographed perspectives of the paw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    Bottom,
    Side,
    Front,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Bottom, ViewKind::Side, ViewKind::Front];

    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Bottom => "bottom",
            ViewKind::Side => "side",
            ViewKind::Front => "front",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Bottom => "Bottom",
            ViewKind::Side => "Side",
            ViewKind::Front => "Front",
        }
    }

    /// Step at which an image for this view is accepted.
    /// The bottom view has no separate upload step.
    pub fn upload_step(&self) -> Step {
        match self {
            ViewKind::Bottom => Step::BottomCalibrate,
            ViewKind::Side => Step::SideUpload,
            ViewKind::Front => Step::FrontUpload,
        }
    }

    /// Step at which the 5 cm reference segment is drawn
    pub fn calibration_step(&self) -> Step {
        match self {
            ViewKind::Bottom => Step::BottomCalibrate,
            ViewKind::Side => Step::SideCalibrate,
            ViewKind::Front => Step::FrontCalibrate,
        }
    }

    /// Step entered right after the calibration is set
    pub fn first_measurement_step(&self) -> Step {
        match self {
            ViewKind::Bottom => Step::BottomLength,
            ViewKind::Side => Step::SideHeight,
            ViewKind::Front => Step::FrontThickness,
        }
    }

    /// Step from which the view is confirmed or rescaled
    pub fn confirm_step(&self) -> Step {
        match self {
            ViewKind::Bottom => Step::BottomWidth,
            ViewKind::Side => Step::SideHeight,
            ViewKind::Front => Step::FrontThickness,
        }
    }

    /// Step entered once the view is confirmed
    pub fn after_confirm(&self) -> Step {
        match self {
            ViewKind::Bottom => Step::SideUpload,
            ViewKind::Side => Step::FrontUpload,
            ViewKind::Front => Step::Summary,
        }
    }

    /// Measurements that must be present before the view can be confirmed
    pub fn required_measurements(&self) -> &'static [MeasurementKind] {
        match self {
            ViewKind::Bottom => &[MeasurementKind::Length, MeasurementKind::Width],
            ViewKind::Side => &[MeasurementKind::Height],
            ViewKind::Front => &[MeasurementKind::Thickness],
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a finished drag means at a given step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawTarget {
    /// The segment is the 5 cm reference for this view
    Calibration(ViewKind),
    /// The segment records this measurement
    Measurement(MeasurementKind),
}

impl DrawTarget {
    pub fn view(&self) -> ViewKind {
        match self {
            DrawTarget::Calibration(view) => *view,
            DrawTarget::Measurement(kind) => kind.view(),
        }
    }
}

/// Wizard position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    DogInfo,
    BottomCalibrate,
    BottomLength,
    BottomWidth,
    SideUpload,
    SideCalibrate,
    SideHeight,
    FrontUpload,
    FrontCalibrate,
    FrontThickness,
    Summary,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::DogInfo,
        Step::BottomCalibrate,
        Step::BottomLength,
        Step::BottomWidth,
        Step::SideUpload,
        Step::SideCalibrate,
        Step::SideHeight,
        Step::FrontUpload,
        Step::FrontCalibrate,
        Step::FrontThickness,
        Step::Summary,
    ];

    /// 1-based position in the sequence
    pub fn number(&self) -> u8 {
        match self {
            Step::DogInfo => 1,
            Step::BottomCalibrate => 2,
            Step::BottomLength => 3,
            Step::BottomWidth => 4,
            Step::SideUpload => 5,
            Step::SideCalibrate => 6,
            Step::SideHeight => 7,
            Step::FrontUpload => 8,
            Step::FrontCalibrate => 9,
            Step::FrontThickness => 10,
            Step::Summary => 11,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::DogInfo => "Dog info",
            Step::BottomCalibrate => "Bottom calibration",
            Step::BottomLength => "Bottom length",
            Step::BottomWidth => "Bottom width",
            Step::SideUpload => "Side upload",
            Step::SideCalibrate => "Side calibration",
            Step::SideHeight => "Side height",
            Step::FrontUpload => "Front upload",
            Step::FrontCalibrate => "Front calibration",
            Step::FrontThickness => "Front thickness",
            Step::Summary => "Summary",
        }
    }

    /// The view this step works on, if any
    pub fn view(&self) -> Option<ViewKind> {
        match self {
            Step::BottomCalibrate | Step::BottomLength | Step::BottomWidth => Some(ViewKind::Bottom),
            Step::SideUpload | Step::SideCalibrate | Step::SideHeight => Some(ViewKind::Side),
            Step::FrontUpload | Step::FrontCalibrate | Step::FrontThickness => Some(ViewKind::Front),
            Step::DogInfo | Step::Summary => None,
        }
    }

    /// What a segment drawn at this step records, if drawing is meaningful here
    pub fn draw_target(&self) -> Option<DrawTarget> {
        match self {
            Step::BottomCalibrate => Some(DrawTarget::Calibration(ViewKind::Bottom)),
            Step::BottomLength => Some(DrawTarget::Measurement(MeasurementKind::Length)),
            Step::BottomWidth => Some(DrawTarget::Measurement(MeasurementKind::Width)),
            Step::SideCalibrate => Some(DrawTarget::Calibration(ViewKind::Side)),
            Step::SideHeight => Some(DrawTarget::Measurement(MeasurementKind::Height)),
            Step::FrontCalibrate => Some(DrawTarget::Calibration(ViewKind::Front)),
            Step::FrontThickness => Some(DrawTarget::Measurement(MeasurementKind::Thickness)),
            _ => None,
        }
    }

    /// Instruction shown to the user for this step
    pub fn prompt(&self) -> &'static str {
        match self {
            Step::DogInfo => "Fill in the dog details and press Enter to start",
            Step::BottomCalibrate | Step::SideCalibrate | Step::FrontCalibrate => {
                "Draw the 5 cm reference along the ruler"
            }
            Step::BottomLength => "Draw the paw LENGTH",
            Step::BottomWidth => "Draw the paw WIDTH",
            Step::SideUpload => "Upload the side view with a ruler",
            Step::SideHeight => "Draw the paw HEIGHT",
            Step::FrontUpload => "Upload the front view with a ruler",
            Step::FrontThickness => "Draw the paw THICKNESS",
            Step::Summary => "Final measurements",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered_in_order() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.number() as usize, i + 1);
        }
    }

    #[test]
    fn test_view_step_runs_are_consistent() {
        for view in ViewKind::ALL {
            assert_eq!(view.calibration_step().view(), Some(view));
            assert_eq!(view.confirm_step().view(), Some(view));
            assert_eq!(
                view.calibration_step().draw_target(),
                Some(DrawTarget::Calibration(view))
            );
            for kind in view.required_measurements() {
                assert_eq!(kind.view(), view);
            }
            assert!(view.after_confirm().number() > view.confirm_step().number());
        }
    }

    #[test]
    fn test_non_drawing_steps() {
        assert!(Step::DogInfo.draw_target().is_none());
        assert!(Step::SideUpload.draw_target().is_none());
        assert!(Step::FrontUpload.draw_target().is_none());
        assert!(Step::Summary.draw_target().is_none());
    }
}
