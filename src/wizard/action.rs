// paw-measure/src/wizard/action.rs

//! Inputs to the transition function and what they produced

use std::path::PathBuf;

use super::measurement::Measurement;
use super::session::{DogField, ImageInfo};
use super::step::ViewKind;
use crate::geometry::{DisplayScale, Point};

/// Everything a user (or the image decoder) can do to a session
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetDogField { field: DogField, value: String },
    Start,
    UploadImage { view: ViewKind, source: PathBuf },
    /// Completion of an asynchronous decode started by an upload
    ImageDecoded {
        view: ViewKind,
        generation: u64,
        result: Result<ImageInfo, String>,
    },
    /// Pointer pressed; `at` is in screen units at the given scale
    BeginSegment { at: Point, scale: DisplayScale },
    ExtendSegment { at: Point, scale: DisplayScale },
    EndSegment,
    Confirm(ViewKind),
    Rescale(ViewKind),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetDogField { .. } => "SetDogField",
            Action::Start => "Start",
            Action::UploadImage { .. } => "UploadImage",
            Action::ImageDecoded { .. } => "ImageDecoded",
            Action::BeginSegment { .. } => "BeginSegment",
            Action::ExtendSegment { .. } => "ExtendSegment",
            Action::EndSegment => "EndSegment",
            Action::Confirm(_) => "Confirm",
            Action::Rescale(_) => "Rescale",
        }
    }
}

/// Why a finished drag was dropped without effect
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiscardReason {
    /// Released without a second point
    Incomplete,
    /// Start and end coincide
    ZeroLength,
    /// Reference segment below the configured minimum length
    CalibrationTooShort { pixels: f64 },
}

/// Result of an accepted action
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    DogInfoUpdated(DogField),
    Started,
    UploadAccepted { view: ViewKind, generation: u64 },
    ImageReady { view: ViewKind, width: u32, height: u32 },
    ImageFailed { view: ViewKind, reason: String },
    /// A decode finished for an upload that has since been replaced
    StaleImageIgnored { view: ViewKind, generation: u64 },
    DraftUpdated,
    CalibrationSet { view: ViewKind, pixels_per_cm: f64 },
    MeasurementRecorded(Measurement),
    SegmentDiscarded(DiscardReason),
    Confirmed(ViewKind),
    Rescaled(ViewKind),
}
