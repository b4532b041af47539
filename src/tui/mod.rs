//! TUI module for the paw measurement wizard
//!
//! Interactive terminal front-end: dog info form, image upload prompts,
//! a mouse-driven measuring canvas and the final summary.

mod app;
pub mod canvas;
mod colors;
mod event;
mod export;
pub mod ui;

pub use app::{App, ImagePaths, InputMode, StatusLevel, StatusMessage};
pub use canvas::{CanvasLayout, CELL_ASPECT};
pub use event::{decode_image, spawn_decode, Event, EventHandler};
pub use export::{write_csv, ExportError};
