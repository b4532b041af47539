// paw-measure/src/wizard/errors.rs

use super::step::{Step, ViewKind};
use thiserror::Error;

/// Rejected wizard actions. The session is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("{action} is not allowed at step {step}")]
    InvalidAction { step: Step, action: &'static str },
    #[error("The {0} image is not loaded yet")]
    ImageNotReady(ViewKind),
    #[error("The {0} view has no calibration")]
    MissingCalibration(ViewKind),
    #[error("Cannot confirm the {0} view before all its measurements are recorded")]
    MissingMeasurements(ViewKind),
    #[error("The {0} view must be confirmed first")]
    ViewNotConfirmed(ViewKind),
}
