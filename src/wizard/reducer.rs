// paw-measure/src/wizard/reducer.rs

//! The transition function
//!
//! `reduce` is the only way a [`Session`] changes. It never mutates its
//! input: an accepted action yields a new session and an [`Outcome`], a
//! rejected one yields a [`WizardError`] and the caller keeps the old state.

use super::action::{Action, DiscardReason, Outcome};
use super::errors::WizardError;
use super::measurement::{Calibration, Measurement};
use super::session::{ImageState, Session};
use super::step::{DrawTarget, Step, ViewKind};
use crate::geometry::{DisplayScale, Point, SegmentDraft};

pub fn reduce(session: &Session, action: Action) -> Result<(Session, Outcome), WizardError> {
    let mut next = session.clone();
    let outcome = apply(&mut next, action)?;
    Ok((next, outcome))
}

fn apply(s: &mut Session, action: Action) -> Result<Outcome, WizardError> {
    let name = action.name();
    let invalid = |step: Step| WizardError::InvalidAction { step, action: name };

    match action {
        Action::SetDogField { field, value } => {
            if s.step != Step::DogInfo {
                return Err(invalid(s.step));
            }
            s.dog.set(field, value);
            Ok(Outcome::DogInfoUpdated(field))
        }

        Action::Start => {
            if s.step != Step::DogInfo {
                return Err(invalid(s.step));
            }
            s.step = Step::BottomCalibrate;
            Ok(Outcome::Started)
        }

        Action::UploadImage { view, source } => {
            if s.upload_target() != Some(view) {
                return Err(invalid(s.step));
            }
            if view == ViewKind::Front {
                for earlier in [ViewKind::Bottom, ViewKind::Side] {
                    if !s.view(earlier).confirmed {
                        return Err(WizardError::ViewNotConfirmed(earlier));
                    }
                }
            }
            let slot = s.views.get_mut(view);
            slot.generation += 1;
            slot.image = ImageState::Decoding { source };
            let generation = slot.generation;
            s.draft = None;
            s.step = view.calibration_step();
            Ok(Outcome::UploadAccepted { view, generation })
        }

        Action::ImageDecoded {
            view,
            generation,
            result,
        } => {
            let slot = s.views.get_mut(view);
            let source = match &slot.image {
                ImageState::Decoding { source } if generation == slot.generation => source.clone(),
                _ => return Ok(Outcome::StaleImageIgnored { view, generation }),
            };
            match result {
                Ok(info) => {
                    let (width, height) = (info.width, info.height);
                    slot.image = ImageState::Ready(info);
                    Ok(Outcome::ImageReady {
                        view,
                        width,
                        height,
                    })
                }
                Err(reason) => {
                    slot.image = ImageState::Failed {
                        source,
                        reason: reason.clone(),
                    };
                    Ok(Outcome::ImageFailed { view, reason })
                }
            }
        }

        Action::BeginSegment { at, scale } => {
            ensure_drawable(s, name)?;
            s.draft = Some(SegmentDraft::begin(to_image(at, scale)));
            Ok(Outcome::DraftUpdated)
        }

        Action::ExtendSegment { at, scale } => {
            ensure_drawable(s, name)?;
            let current = s.step;
            let draft = s.draft.as_mut().ok_or_else(|| invalid(current))?;
            draft.extend(to_image(at, scale));
            Ok(Outcome::DraftUpdated)
        }

        Action::EndSegment => end_segment(s),

        Action::Confirm(view) => {
            if s.step != view.confirm_step() {
                return Err(invalid(s.step));
            }
            if !s.measurements.has_all(view) {
                return Err(WizardError::MissingMeasurements(view));
            }
            let earlier = ViewKind::ALL.iter().take_while(|v| **v != view);
            if let Some(unconfirmed) = earlier.copied().find(|v| !s.view(*v).confirmed) {
                return Err(WizardError::ViewNotConfirmed(unconfirmed));
            }
            s.views.get_mut(view).confirmed = true;
            s.draft = None;
            s.step = view.after_confirm();
            Ok(Outcome::Confirmed(view))
        }

        Action::Rescale(view) => {
            if s.step != view.confirm_step() {
                return Err(invalid(s.step));
            }
            let slot = s.views.get_mut(view);
            slot.calibration = None;
            slot.confirmed = false;
            s.measurements.clear_view(view);
            s.draft = None;
            s.step = view.calibration_step();
            Ok(Outcome::Rescaled(view))
        }
    }
}

fn to_image(at: Point, scale: DisplayScale) -> Point {
    scale.to_image(at)
}

/// Drawing needs a drawing step and a decoded image for its view
fn ensure_drawable(s: &Session, action: &'static str) -> Result<DrawTarget, WizardError> {
    let target = s.step.draw_target().ok_or(WizardError::InvalidAction {
        step: s.step,
        action,
    })?;
    if !s.view(target.view()).image.is_ready() {
        return Err(WizardError::ImageNotReady(target.view()));
    }
    Ok(target)
}

fn end_segment(s: &mut Session) -> Result<Outcome, WizardError> {
    let segment = match s.draft.take().as_ref().and_then(SegmentDraft::finish) {
        Some(segment) => segment,
        None => return Ok(Outcome::SegmentDiscarded(DiscardReason::Incomplete)),
    };
    let pixels = segment.pixel_length();
    if segment.is_degenerate() || pixels == 0.0 {
        return Ok(Outcome::SegmentDiscarded(DiscardReason::ZeroLength));
    }
    let target = match s.step.draw_target() {
        Some(target) => target,
        None => return Ok(Outcome::SegmentDiscarded(DiscardReason::Incomplete)),
    };

    match target {
        DrawTarget::Calibration(view) => {
            let calibration = match Calibration::from_reference(pixels) {
                Some(c) if pixels >= s.config.min_calibration_px => c,
                _ => {
                    return Ok(Outcome::SegmentDiscarded(
                        DiscardReason::CalibrationTooShort { pixels },
                    ))
                }
            };
            s.views.get_mut(view).calibration = Some(calibration);
            s.step = view.first_measurement_step();
            Ok(Outcome::CalibrationSet {
                view,
                pixels_per_cm: calibration.pixels_per_cm(),
            })
        }
        DrawTarget::Measurement(kind) => {
            let view = kind.view();
            let calibration = s
                .view(view)
                .calibration
                .ok_or(WizardError::MissingCalibration(view))?;
            let measurement = Measurement::new(kind, segment, &calibration);
            s.measurements.record(measurement);
            if s.step == Step::BottomLength {
                s.step = Step::BottomWidth;
            }
            Ok(Outcome::MeasurementRecorded(measurement))
        }
    }
}
