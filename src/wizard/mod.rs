// paw-measure/src/wizard/mod.rs

mod action;
mod errors;
mod measurement;
mod reducer;
mod session;
mod step;

pub use action::{Action, DiscardReason, Outcome};
pub use errors::WizardError;
pub use measurement::{Calibration, Measurement, MeasurementKind, Measurements, REFERENCE_LENGTH_CM};
pub use reducer::reduce;
pub use session::{
    DogField, DogInfo, DogInfoBuilder, FinalRecord, ImageInfo, ImageState, OverlayItem, Session,
    View, Views, WizardConfig, WizardConfigBuilder, WizardConfigBuilderError,
    DEFAULT_MIN_CALIBRATION_PX,
};
pub use step::{DrawTarget, Step, ViewKind};

use log::{debug, info, warn};

/// Owns the session and feeds actions through [`reduce`]
#[derive(Debug, Default)]
pub struct Wizard {
    session: Session,
}

impl Wizard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn step(&self) -> Step {
        self.session.step
    }

    /// Apply an action. On error the session is unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, WizardError> {
        let name = action.name();
        let before = self.session.step;
        match reduce(&self.session, action) {
            Ok((next, outcome)) => {
                debug!("{} at step {}: {:?}", name, before, outcome);
                if next.step != before {
                    info!("Step {} -> {}", before, next.step);
                }
                self.session = next;
                Ok(outcome)
            }
            Err(e) => {
                warn!("{} rejected: {}", name, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dispatch_keeps_state_on_error() {
        let mut wizard = Wizard::default();
        let before = wizard.session().clone();
        let err = wizard.dispatch(Action::Confirm(ViewKind::Bottom)).unwrap_err();
        assert!(matches!(err, WizardError::InvalidAction { .. }));
        assert_eq!(wizard.session(), &before);
    }

    #[test]
    fn test_dispatch_advances() {
        let dog = DogInfoBuilder::default().breed("Akita").build().unwrap();
        let mut wizard = Wizard::new(Session::default().with_dog(dog));
        assert_eq!(wizard.dispatch(Action::Start), Ok(Outcome::Started));
        assert_eq!(wizard.step(), Step::BottomCalibrate);
        assert_eq!(wizard.session().dog.breed, "Akita");

        let outcome = wizard
            .dispatch(Action::UploadImage {
                view: ViewKind::Bottom,
                source: PathBuf::from("paw.png"),
            })
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::UploadAccepted {
                view: ViewKind::Bottom,
                generation: 1
            }
        );
        assert_eq!(wizard.step(), Step::BottomCalibrate);
    }
}
