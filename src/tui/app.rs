//! Main application state
//!
//! Wraps the measurement wizard with everything the terminal needs: text
//! entry for dog info and image paths, mouse dragging on the canvas,
//! status messages and export.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use super::canvas::CanvasLayout;
use super::event::{spawn_decode, Event};
use super::export::{write_csv, ExportError};

use crate::wizard::{
    Action, DiscardReason, DogField, ImageInfo, ImageState, MeasurementKind, Outcome, Session,
    Step, ViewKind, Wizard, WizardError,
};

/// Image paths supplied on the command line, offered in the upload prompts
#[derive(Clone, Debug, Default)]
pub struct ImagePaths {
    pub bottom: Option<PathBuf>,
    pub side: Option<PathBuf>,
    pub front: Option<PathBuf>,
}

impl ImagePaths {
    fn get(&self, view: ViewKind) -> Option<&PathBuf> {
        match view {
            ViewKind::Bottom => self.bottom.as_ref(),
            ViewKind::Side => self.side.as_ref(),
            ViewKind::Front => self.front.as_ref(),
        }
    }
}

/// What keyboard input currently goes to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Typing into the dog info form
    DogForm,
    /// Typing an image path for this view
    ImagePath(ViewKind),
    /// Waiting for an image to decode
    Loading(ViewKind),
    /// Drawing on the canvas
    Canvas(ViewKind),
    /// Final summary
    Summary,
}

/// Main application state
pub struct App {
    /// The measurement wizard
    pub wizard: Wizard,

    /// Focused field in the dog info form
    pub form_focus: usize,

    /// Text typed into the upload prompt
    pub path_input: String,

    /// Paths to prefill the upload prompts with
    pub image_paths: ImagePaths,

    /// Destination for CSV export, if enabled
    pub export_path: Option<PathBuf>,

    /// Upload prompt reopened over a loaded image
    pub replacing_image: bool,

    /// Whether to show help overlay
    pub show_help: bool,

    /// Animation frame counter (for spinners)
    pub frame: usize,

    /// Status message (bottom bar)
    pub status_message: Option<StatusMessage>,

    /// Canvas placement from the last draw, for mouse hit detection
    pub canvas: Option<CanvasLayout>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Where decoders report back; `None` when no runtime is attached
    events: Option<mpsc::UnboundedSender<Event>>,
}

/// Status message displayed at the bottom
#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub expires: Instant,
}

/// Status message severity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
    Success,
}

const STATUS_TTL: Duration = Duration::from_secs(4);

impl App {
    /// Create a new application around a fresh session
    pub fn new(session: Session, image_paths: ImagePaths, export_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            wizard: Wizard::new(session),
            form_focus: 0,
            path_input: String::new(),
            image_paths,
            export_path,
            replacing_image: false,
            show_help: false,
            frame: 0,
            status_message: None,
            canvas: None,
            should_quit: false,
            events: None,
        };
        app.sync_path_input();
        app
    }

    /// Attach the event channel used to report decoded images
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn session(&self) -> &Session {
        self.wizard.session()
    }

    pub fn input_mode(&self) -> InputMode {
        let session = self.session();
        if session.step == Step::DogInfo {
            return InputMode::DogForm;
        }
        if session.step == Step::Summary {
            return InputMode::Summary;
        }
        let view = match session.active_view() {
            Some(view) => view,
            None => return InputMode::Summary,
        };
        match &session.view(view).image {
            ImageState::Decoding { .. } => InputMode::Loading(view),
            ImageState::Ready(_)
                if self.replacing_image && session.upload_target() == Some(view) =>
            {
                InputMode::ImagePath(view)
            }
            ImageState::Ready(_) if session.drawing_enabled() => InputMode::Canvas(view),
            _ => InputMode::ImagePath(view),
        }
    }

    /// True while keystrokes are text rather than commands
    pub fn is_typing(&self) -> bool {
        matches!(
            self.input_mode(),
            InputMode::DogForm | InputMode::ImagePath(_)
        )
    }

    pub fn focused_field(&self) -> DogField {
        DogField::ALL[self.form_focus % DogField::ALL.len()]
    }

    /// Handle tick events (animation, message expiry)
    pub fn on_tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);

        // Clear expired status messages
        if let Some(ref msg) = self.status_message {
            if Instant::now() > msg.expires {
                self.status_message = None;
            }
        }
    }

    /// Handle key events
    pub fn on_key(&mut self, key: KeyEvent) {
        // Global shortcuts (work in any mode)
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if !self.is_typing() => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') if !self.is_typing() => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::F(1) => {
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            _ => {}
        }

        match self.input_mode() {
            InputMode::DogForm => self.handle_form_key(key),
            InputMode::ImagePath(view) => self.handle_path_key(view, key),
            InputMode::Loading(_) => {}
            InputMode::Canvas(view) => self.handle_canvas_key(view, key),
            InputMode::Summary => self.handle_summary_key(key),
        }
    }

    /// Handle mouse events
    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let layout = match (self.input_mode(), self.canvas) {
            (InputMode::Canvas(_), Some(layout)) => layout,
            _ => return,
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !layout.contains(mouse.column, mouse.row) {
                    return;
                }
                let at = layout.screen_point(mouse.column, mouse.row);
                let result = self.wizard.dispatch(Action::BeginSegment {
                    at,
                    scale: layout.scale,
                });
                if let Err(e) = result {
                    self.report_error(e);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.session().draft.is_some() {
                    self.extend_draft(&layout, mouse.column, mouse.row);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.session().draft.is_none() {
                    return;
                }
                // Drags are throttled, so the release position may be newer
                self.extend_draft(&layout, mouse.column, mouse.row);
                let result = self.wizard.dispatch(Action::EndSegment);
                self.report(result);
            }
            _ => {}
        }
    }

    fn extend_draft(&mut self, layout: &CanvasLayout, column: u16, row: u16) {
        // Clamp to the canvas so a drag leaving it still ends on the image
        let col = column.clamp(
            layout.area.x,
            layout.area.x + layout.area.width.saturating_sub(1),
        );
        let row = row.clamp(
            layout.area.y,
            layout.area.y + layout.area.height.saturating_sub(1),
        );
        let at = layout.screen_point(col, row);
        if let Err(e) = self.wizard.dispatch(Action::ExtendSegment {
            at,
            scale: layout.scale,
        }) {
            debug!("Extend rejected: {}", e);
        }
    }

    /// Apply the result of a background decode
    pub fn on_image_decoded(
        &mut self,
        view: ViewKind,
        generation: u64,
        result: Result<ImageInfo, String>,
    ) {
        let result = self.wizard.dispatch(Action::ImageDecoded {
            view,
            generation,
            result,
        });
        self.report(result);
        self.sync_path_input();
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let field = self.focused_field();
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form_focus = (self.form_focus + 1) % DogField::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_focus = (self.form_focus + DogField::ALL.len() - 1) % DogField::ALL.len();
            }
            KeyCode::Char(c) => {
                let mut value = self.session().dog.get(field).to_string();
                value.push(c);
                self.set_dog_field(field, value);
            }
            KeyCode::Backspace => {
                let mut value = self.session().dog.get(field).to_string();
                value.pop();
                self.set_dog_field(field, value);
            }
            KeyCode::Enter => {
                let result = self.wizard.dispatch(Action::Start);
                self.report(result);
                self.sync_path_input();
            }
            _ => {}
        }
    }

    fn set_dog_field(&mut self, field: DogField, value: String) {
        if let Err(e) = self.wizard.dispatch(Action::SetDogField { field, value }) {
            self.report_error(e);
        }
    }

    fn handle_path_key(&mut self, view: ViewKind, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.path_input.push(c),
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Esc if self.replacing_image => {
                self.replacing_image = false;
                self.path_input.clear();
            }
            KeyCode::Esc => self.path_input.clear(),
            KeyCode::Enter => self.submit_upload(view),
            _ => {}
        }
    }

    /// Upload the typed path and start decoding it
    pub fn submit_upload(&mut self, view: ViewKind) {
        let typed = self.path_input.trim();
        if typed.is_empty() {
            self.set_status("Enter an image path first", StatusLevel::Warning);
            return;
        }
        let source = PathBuf::from(typed);
        let result = self.wizard.dispatch(Action::UploadImage {
            view,
            source: source.clone(),
        });
        if let Ok(Outcome::UploadAccepted { view, generation }) = result {
            self.replacing_image = false;
            self.path_input.clear();
            match &self.events {
                Some(tx) => spawn_decode(tx.clone(), view, generation, source),
                None => debug!("No event channel, decode of {} left pending", source.display()),
            }
        }
        self.report(result);
    }

    fn handle_canvas_key(&mut self, view: ViewKind, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('c') | KeyCode::Enter => Action::Confirm(view),
            KeyCode::Char('r') => Action::Rescale(view),
            KeyCode::Char('u') => {
                self.reopen_upload(view);
                return;
            }
            _ => return,
        };
        let result = self.wizard.dispatch(action);
        self.report(result);
        self.sync_path_input();
    }

    /// Offer the upload prompt again while the reference is not drawn yet
    fn reopen_upload(&mut self, view: ViewKind) {
        if self.session().upload_target() != Some(view) {
            self.set_status(
                "The image can only be replaced before calibrating, press [r] to rescale first",
                StatusLevel::Warning,
            );
            return;
        }
        self.path_input = self
            .session()
            .view(view)
            .image
            .ready()
            .map(|info| info.source.display().to_string())
            .unwrap_or_default();
        self.replacing_image = true;
    }

    fn handle_summary_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char('e') = key.code {
            match self.perform_export() {
                Ok(path) => self.set_status(
                    format!("Exported to {}", path.display()),
                    StatusLevel::Success,
                ),
                Err(e) => self.set_status(format!("Export failed: {}", e), StatusLevel::Error),
            }
        }
    }

    /// Write the final record to the configured CSV file
    pub fn perform_export(&self) -> Result<PathBuf, ExportError> {
        let record = self.session().final_record().ok_or(ExportError::NotFinished)?;
        let path = self.export_path.clone().ok_or(ExportError::NoDestination)?;
        write_csv(&path, &record)?;
        info!("Exported final record to {}", path.display());
        Ok(path)
    }

    /// Offer the command-line path when an upload prompt opens
    fn sync_path_input(&mut self) {
        if let InputMode::ImagePath(view) = self.input_mode() {
            if self.path_input.is_empty() {
                if let Some(path) = self.image_paths.get(view) {
                    self.path_input = path.display().to_string();
                }
            }
        }
    }

    /// Turn a wizard result into a status message
    fn report(&mut self, result: Result<Outcome, WizardError>) {
        match result {
            Ok(outcome) => {
                if let Some((text, level)) = describe(&outcome, self.session().step) {
                    self.set_status(text, level);
                }
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, e: WizardError) {
        let level = match e {
            WizardError::ImageNotReady(_) => StatusLevel::Warning,
            _ => StatusLevel::Error,
        };
        self.set_status(e.to_string(), level);
    }

    /// Set a status message
    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            level,
            expires: Instant::now() + STATUS_TTL,
        });
    }

    /// Spinner character for the current frame
    pub fn spinner(&self) -> char {
        const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
        FRAMES[self.frame % FRAMES.len()]
    }
}

fn describe(outcome: &Outcome, step: Step) -> Option<(String, StatusLevel)> {
    let next = step.prompt();
    let message = match outcome {
        Outcome::DogInfoUpdated(_) | Outcome::DraftUpdated => return None,
        Outcome::Started => (format!("Started. {}", next), StatusLevel::Info),
        Outcome::UploadAccepted { view, .. } => {
            (format!("Loading {} image...", view), StatusLevel::Info)
        }
        Outcome::ImageReady {
            view,
            width,
            height,
        } => (
            format!("{} image {}x{} loaded. {}", view.title(), width, height, next),
            StatusLevel::Success,
        ),
        Outcome::ImageFailed { reason, .. } => (reason.clone(), StatusLevel::Error),
        Outcome::StaleImageIgnored { .. } => return None,
        Outcome::CalibrationSet {
            view,
            pixels_per_cm,
        } => (
            format!(
                "{} scale set ({:.2} px/cm). {}",
                view.title(),
                pixels_per_cm,
                next
            ),
            StatusLevel::Success,
        ),
        Outcome::MeasurementRecorded(m) => {
            let hint = if m.kind == MeasurementKind::Length {
                next
            } else {
                "Redraw to replace, [c] confirm, [r] rescale"
            };
            (format!("{} recorded. {}", m, hint), StatusLevel::Success)
        }
        Outcome::SegmentDiscarded(reason) => match reason {
            DiscardReason::Incomplete => return None,
            DiscardReason::ZeroLength => {
                ("Segment has no length, ignored".to_string(), StatusLevel::Warning)
            }
            DiscardReason::CalibrationTooShort { pixels } => (
                format!("Reference segment too short ({:.1} px), draw it again", pixels),
                StatusLevel::Warning,
            ),
        },
        Outcome::Confirmed(view) => (
            format!("{} view confirmed. {}", view.title(), next),
            StatusLevel::Success,
        ),
        Outcome::Rescaled(view) => (
            format!("{} view cleared. {}", view.title(), next),
            StatusLevel::Info,
        ),
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::DogInfoBuilder;
    use crossterm::event::KeyEventKind;
    use ratatui::prelude::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn ready(app: &mut App, view: ViewKind) {
        let generation = app.session().view(view).generation;
        app.on_image_decoded(
            view,
            generation,
            Ok(ImageInfo {
                source: PathBuf::from("paw.png"),
                width: 100,
                height: 100,
            }),
        );
        // Full-size canvas at the origin: one column is one image pixel
        app.canvas = Some(CanvasLayout {
            area: Rect::new(0, 0, 100, 50),
            image_width: 100,
            image_height: 100,
            scale: crate::geometry::DisplayScale::IDENTITY,
        });
    }

    fn drag(app: &mut App, from: u16, to: u16) {
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), from, 5));
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), to, 5));
        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), to, 5));
    }

    fn new_app() -> App {
        App::new(Session::default(), ImagePaths::default(), None)
    }

    #[test]
    fn test_form_typing_and_start() {
        let mut app = new_app();
        assert_eq!(app.input_mode(), InputMode::DogForm);
        type_text(&mut app, "Pug");
        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "Mx");
        app.on_key(key(KeyCode::Backspace));
        // 'q' is text while typing
        app.on_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);

        assert_eq!(app.session().dog.breed, "Pug");
        assert_eq!(app.session().dog.sex, "Mq");

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.session().step, Step::BottomCalibrate);
        assert_eq!(app.input_mode(), InputMode::ImagePath(ViewKind::Bottom));
    }

    #[test]
    fn test_prefilled_paths() {
        let paths = ImagePaths {
            bottom: Some(PathBuf::from("bottom.jpg")),
            ..Default::default()
        };
        let dog = DogInfoBuilder::default().breed("Lab").build().unwrap();
        let mut app = App::new(Session::default().with_dog(dog), paths, None);
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.path_input, "bottom.jpg");

        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode(), InputMode::Loading(ViewKind::Bottom));
        assert!(app.path_input.is_empty());
    }

    #[test]
    fn test_mouse_measurement_flow() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bottom.png");
        app.on_key(key(KeyCode::Enter));
        ready(&mut app, ViewKind::Bottom);
        assert_eq!(app.input_mode(), InputMode::Canvas(ViewKind::Bottom));

        drag(&mut app, 0, 50); // 50 px reference -> 10 px/cm
        assert_eq!(app.session().step, Step::BottomLength);
        drag(&mut app, 10, 80); // 70 px -> 7 cm
        drag(&mut app, 10, 40); // 30 px -> 3 cm
        let m = &app.session().measurements;
        assert!((m.get(MeasurementKind::Length).unwrap().value_cm - 7.0).abs() < 1e-9);
        assert!((m.get(MeasurementKind::Width).unwrap().value_cm - 3.0).abs() < 1e-9);

        app.on_key(key(KeyCode::Char('c')));
        assert_eq!(app.session().step, Step::SideUpload);
        assert_eq!(app.input_mode(), InputMode::ImagePath(ViewKind::Side));
    }

    #[test]
    fn test_click_without_drag_is_ignored() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bottom.png");
        app.on_key(key(KeyCode::Enter));
        ready(&mut app, ViewKind::Bottom);

        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 3));
        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 3, 3));
        assert_eq!(app.session().step, Step::BottomCalibrate);
        assert!(app.session().view(ViewKind::Bottom).calibration.is_none());
    }

    #[test]
    fn test_rescale_key() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bottom.png");
        app.on_key(key(KeyCode::Enter));
        ready(&mut app, ViewKind::Bottom);
        drag(&mut app, 0, 50);
        drag(&mut app, 0, 70);
        drag(&mut app, 0, 30);

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.session().step, Step::BottomCalibrate);
        assert!(app.session().view(ViewKind::Bottom).calibration.is_none());
        assert_eq!(app.input_mode(), InputMode::Canvas(ViewKind::Bottom));
    }

    #[test]
    fn test_failed_decode_reopens_prompt() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bad.png");
        app.on_key(key(KeyCode::Enter));
        app.on_image_decoded(ViewKind::Bottom, 1, Err("unsupported".to_string()));

        assert_eq!(app.input_mode(), InputMode::ImagePath(ViewKind::Bottom));
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
    }

    #[test]
    fn test_quit_and_help_keys() {
        let mut app = new_app();
        app.on_key(key(KeyCode::F(1)));
        assert!(app.show_help);
        app.on_key(key(KeyCode::Esc));
        assert!(!app.show_help);

        let mut ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        ctrl_c.kind = KeyEventKind::Press;
        app.on_key(ctrl_c);
        assert!(app.should_quit);
    }

    #[test]
    fn test_export_before_summary() {
        let app = new_app();
        assert!(matches!(
            app.perform_export(),
            Err(ExportError::NotFinished)
        ));
    }

    #[test]
    fn test_replace_image_before_calibrating() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bottom.png");
        app.on_key(key(KeyCode::Enter));
        ready(&mut app, ViewKind::Bottom);

        app.on_key(key(KeyCode::Char('u')));
        assert_eq!(app.input_mode(), InputMode::ImagePath(ViewKind::Bottom));
        assert_eq!(app.path_input, "paw.png");

        // Esc backs out to the canvas with the old image
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode(), InputMode::Canvas(ViewKind::Bottom));

        app.on_key(key(KeyCode::Char('u')));
        app.on_key(key(KeyCode::Backspace));
        app.on_key(key(KeyCode::Backspace));
        app.on_key(key(KeyCode::Backspace));
        type_text(&mut app, "jpg");
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode(), InputMode::Loading(ViewKind::Bottom));
        assert!(!app.replacing_image);
        let view = app.session().view(ViewKind::Bottom);
        assert_eq!(view.generation, 2);
        assert_eq!(
            view.image,
            ImageState::Decoding {
                source: PathBuf::from("paw.jpg")
            }
        );
    }

    #[test]
    fn test_replace_image_refused_after_calibrating() {
        let mut app = new_app();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "bottom.png");
        app.on_key(key(KeyCode::Enter));
        ready(&mut app, ViewKind::Bottom);
        drag(&mut app, 0, 50);
        assert_eq!(app.session().step, Step::BottomLength);

        app.on_key(key(KeyCode::Char('u')));
        assert!(!app.replacing_image);
        assert_eq!(app.input_mode(), InputMode::Canvas(ViewKind::Bottom));
        assert_eq!(
            app.status_message.as_ref().map(|m| m.level),
            Some(StatusLevel::Warning)
        );
    }
}
