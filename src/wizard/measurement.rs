// paw-measure/src/wizard/measurement.rs

//! Calibration and measurement arithmetic

use std::fmt;

use super::step::ViewKind;
use crate::geometry::Segment;

/// Real-world length of the reference segment drawn along the ruler
pub const REFERENCE_LENGTH_CM: f64 = 5.0;

/// Pixels per centimeter for one view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pixels_per_cm: f64,
}

impl Calibration {
    /// Calibration from a reference segment of the given pixel length.
    /// Returns `None` unless the result is finite and positive.
    pub fn from_reference(pixel_length: f64) -> Option<Self> {
        let pixels_per_cm = pixel_length / REFERENCE_LENGTH_CM;
        if pixels_per_cm.is_finite() && pixels_per_cm > 0.0 {
            Some(Self { pixels_per_cm })
        } else {
            None
        }
    }

    pub fn pixels_per_cm(&self) -> f64 {
        self.pixels_per_cm
    }

    pub fn to_cm(&self, pixel_length: f64) -> f64 {
        pixel_length / self.pixels_per_cm
    }
}

/// The four anatomical dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Length,
    Width,
    Height,
    Thickness,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::Length,
        MeasurementKind::Width,
        MeasurementKind::Height,
        MeasurementKind::Thickness,
    ];

    /// View whose calibration converts this measurement
    pub fn view(&self) -> ViewKind {
        match self {
            MeasurementKind::Length | MeasurementKind::Width => ViewKind::Bottom,
            MeasurementKind::Height => ViewKind::Side,
            MeasurementKind::Thickness => ViewKind::Front,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Length => "Length",
            MeasurementKind::Width => "Width",
            MeasurementKind::Height => "Height",
            MeasurementKind::Thickness => "Thickness",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded dimension: the drawn segment and its value in centimeters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub segment: Segment,
    pub value_cm: f64,
}

impl Measurement {
    pub fn new(kind: MeasurementKind, segment: Segment, calibration: &Calibration) -> Self {
        Self {
            kind,
            segment,
            value_cm: calibration.to_cm(segment.pixel_length()),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2} cm", self.kind, self.value_cm)
    }
}

/// The measurement slots of a session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    length: Option<Measurement>,
    width: Option<Measurement>,
    height: Option<Measurement>,
    thickness: Option<Measurement>,
}

impl Measurements {
    pub fn get(&self, kind: MeasurementKind) -> Option<&Measurement> {
        self.slot(kind).as_ref()
    }

    /// Store a measurement, replacing any previous one of the same kind
    pub fn record(&mut self, measurement: Measurement) {
        *self.slot_mut(measurement.kind) = Some(measurement);
    }

    /// Drop every measurement that belongs to `view`
    pub fn clear_view(&mut self, view: ViewKind) {
        for kind in view.required_measurements() {
            *self.slot_mut(*kind) = None;
        }
    }

    /// Recorded measurements of one view, in display order
    pub fn for_view(&self, view: ViewKind) -> impl Iterator<Item = &Measurement> + '_ {
        view.required_measurements()
            .iter()
            .filter_map(move |kind| self.get(*kind))
    }

    pub fn has_all(&self, view: ViewKind) -> bool {
        view.required_measurements()
            .iter()
            .all(|kind| self.get(*kind).is_some())
    }

    fn slot(&self, kind: MeasurementKind) -> &Option<Measurement> {
        match kind {
            MeasurementKind::Length => &self.length,
            MeasurementKind::Width => &self.width,
            MeasurementKind::Height => &self.height,
            MeasurementKind::Thickness => &self.thickness,
        }
    }

    fn slot_mut(&mut self, kind: MeasurementKind) -> &mut Option<Measurement> {
        match kind {
            MeasurementKind::Length => &mut self.length,
            MeasurementKind::Width => &mut self.width,
            MeasurementKind::Height => &mut self.height,
            MeasurementKind::Thickness => &mut self.thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn horizontal(len: f64) -> Segment {
        Segment::new(Point::new(0.0, 0.0), Point::new(len, 0.0))
    }

    #[test]
    fn test_calibration_is_pixels_over_five() {
        let cal = Calibration::from_reference(100.0).unwrap();
        assert!((cal.pixels_per_cm() - 20.0).abs() < 1e-12);
        assert!((cal.to_cm(150.0) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_rejects_zero() {
        assert!(Calibration::from_reference(0.0).is_none());
        assert!(Calibration::from_reference(f64::INFINITY).is_none());
    }

    #[test]
    fn test_clear_view_leaves_other_views() {
        let cal = Calibration::from_reference(50.0).unwrap();
        let mut m = Measurements::default();
        m.record(Measurement::new(MeasurementKind::Length, horizontal(30.0), &cal));
        m.record(Measurement::new(MeasurementKind::Width, horizontal(20.0), &cal));
        m.record(Measurement::new(MeasurementKind::Height, horizontal(10.0), &cal));

        assert!(m.has_all(ViewKind::Bottom));
        m.clear_view(ViewKind::Bottom);
        assert!(m.get(MeasurementKind::Length).is_none());
        assert!(m.get(MeasurementKind::Width).is_none());
        assert!(m.get(MeasurementKind::Height).is_some());
        assert_eq!(m.for_view(ViewKind::Side).count(), 1);
    }

    #[test]
    fn test_record_replaces_same_kind() {
        let cal = Calibration::from_reference(10.0).unwrap();
        let mut m = Measurements::default();
        m.record(Measurement::new(MeasurementKind::Width, horizontal(4.0), &cal));
        m.record(Measurement::new(MeasurementKind::Width, horizontal(6.0), &cal));
        let width = m.get(MeasurementKind::Width).unwrap();
        assert!((width.value_cm - 3.0).abs() < 1e-12);
        assert_eq!(width.to_string(), "Width: 3.00 cm");
    }
}
