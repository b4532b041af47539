//! Color coding for overlays and the progress list
//!
//! - Each measurement kind has its own line color
//! - The segment being dragged is blue
//! - Steps: done = green, current = yellow, upcoming = gray

use ratatui::style::Color;

use crate::wizard::{MeasurementKind, Step};

pub fn measurement_color(kind: MeasurementKind) -> Color {
    match kind {
        MeasurementKind::Length => Color::Red,
        MeasurementKind::Width => Color::Rgb(255, 165, 0), // Orange
        MeasurementKind::Height => Color::Magenta,
        MeasurementKind::Thickness => Color::Green,
    }
}

pub fn draft_color() -> Color {
    Color::Blue
}

/// Returns the foreground color of a step in the progress list
pub fn get_step_color(step: Step, current: Step) -> Color {
    if step == current {
        Color::Yellow
    } else if step.number() < current.number() {
        Color::Green
    } else {
        Color::DarkGray
    }
}
