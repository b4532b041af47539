//! Main UI layout and rendering
//!
//! Composes all panels into the final TUI layout

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::{App, InputMode, StatusLevel};
use super::canvas::{render_canvas, CanvasLayout};
use super::colors::{get_step_color, measurement_color};
use super::export::render_summary_panel;
use crate::wizard::{DogField, ImageState, MeasurementKind, Step, ViewKind};

/// Draw the complete UI
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: header, body, footer
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header/title
            Constraint::Min(15),   // Body
            Constraint::Length(3), // Status/help bar
        ])
        .split(area);

    render_header(frame, main_layout[0], app);
    render_body(frame, main_layout[1], app);
    render_footer(frame, main_layout[2], app);

    // Help overlay if active
    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.session().step;
    let title = Paragraph::new(format!(
        "Paw Measurement Tool - Step {}/{}: {}",
        step.number(),
        Step::ALL.len(),
        step.title()
    ))
    .style(Style::default().fg(Color::Cyan).bold())
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut App) {
    // Split body: workspace (left) + progress (right)
    let body_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Workspace
            Constraint::Percentage(30), // Progress panel
        ])
        .split(area);

    render_workspace(frame, body_layout[0], app);
    render_progress(frame, body_layout[1], app);
}

fn render_workspace(frame: &mut Frame, area: Rect, app: &mut App) {
    // Only the measuring view records a canvas for hit detection
    app.canvas = None;

    match app.input_mode() {
        InputMode::DogForm => render_dog_form(frame, area, app),
        InputMode::ImagePath(view) => render_upload_prompt(frame, area, app, view),
        InputMode::Loading(view) => {
            let block = workspace_block(format!(" {} view ", view.title()));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let text = Paragraph::new(format!("{} Loading {} image...", app.spinner(), view))
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(text, inner);
        }
        InputMode::Canvas(view) => render_measuring(frame, area, app, view),
        InputMode::Summary => {
            let record = app.session().final_record();
            render_summary_panel(frame, area, record.as_ref(), app.export_path.as_deref());
        }
    }
}

fn workspace_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn render_dog_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = workspace_block(" Dog Info ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focused = app.focused_field();
    let mut lines: Vec<Line> = vec![];
    for field in DogField::ALL {
        let is_focused = field == focused;
        let label_style = if is_focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if is_focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<8}", format!("{}:", field.label())), label_style),
            Span::raw(format!("{}{}", app.session().dog.get(field), cursor)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " [Enter] Start",
        Style::default().fg(Color::Green),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_upload_prompt(frame: &mut Frame, area: Rect, app: &App, view: ViewKind) {
    let block = workspace_block(format!(" {} view ", view.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = vec![
        Line::from(format!("Upload the {} paw photo with a ruler next to it", view)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image path: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}_", app.path_input),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    if let ImageState::Failed { source, reason } = &app.session().view(view).image {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Could not load {}: {}", source.display(), reason),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_measuring(frame: &mut Frame, area: Rect, app: &mut App, view: ViewKind) {
    let step = app.session().step;
    let block = workspace_block(format!(" {} view - {} ", view.title(), step.prompt()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let image = match app.session().view(view).image.ready() {
        Some(info) => info.clone(),
        None => return,
    };
    let layout = match CanvasLayout::fit(inner, &image) {
        Some(layout) => layout,
        None => {
            // Nothing to hit-test, drawing stays off until the terminal grows
            let text = Paragraph::new("Terminal too small to show the image")
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(text, inner);
            return;
        }
    };
    render_canvas(frame, &layout, app.session());

    // Store canvas placement for mouse hit detection
    app.canvas = Some(layout);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Progress ")
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let session = app.session();
    let mut lines: Vec<Line> = vec![];

    for step in Step::ALL {
        let marker = if step == session.step {
            ">"
        } else if step.number() < session.step.number() {
            "x"
        } else {
            " "
        };
        lines.push(Line::from(Span::styled(
            format!("{} {:>2}. {}", marker, step.number(), step.title()),
            Style::default().fg(get_step_color(step, session.step)),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Scale:", Style::default().bold())));
    for view in ViewKind::ALL {
        let text = match session.view(view).calibration {
            Some(c) => format!(" {:<7}{:>8.2} px/cm", view.name(), c.pixels_per_cm()),
            None => format!(" {:<7}{:>8}", view.name(), "-"),
        };
        lines.push(Line::from(text));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Measurements:", Style::default().bold())));
    for kind in MeasurementKind::ALL {
        let value = session
            .measurements
            .get(kind)
            .map(|m| format!("{:>6.2} cm", m.value_cm))
            .unwrap_or_else(|| format!("{:>6}", "-"));
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<10}", kind.label()),
                Style::default().fg(measurement_color(kind)),
            ),
            Span::raw(value),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let content = if let Some(ref msg) = app.status_message {
        let style = match msg.level {
            StatusLevel::Info => Style::default().fg(Color::White),
            StatusLevel::Warning => Style::default().fg(Color::Yellow),
            StatusLevel::Error => Style::default().fg(Color::Red),
            StatusLevel::Success => Style::default().fg(Color::Green),
        };
        Paragraph::new(msg.text.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
    } else {
        let help = match app.input_mode() {
            InputMode::DogForm => "type to edit | Tab/arrows: next field | Enter: start | F1: help",
            InputMode::ImagePath(_) => "type a path | Enter: load | Esc: clear/cancel | F1: help",
            InputMode::Loading(_) => "loading image... | q: quit",
            InputMode::Canvas(_) => "drag: draw segment | c: confirm | r: rescale | u: new image | ?: help | q: quit",
            InputMode::Summary => "e: export CSV | q: quit",
        };
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray))
    };

    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(content.alignment(Alignment::Center), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    // Center the help popup
    let popup_width = 60u16.min(area.width);
    let popup_height = 26u16.min(area.height);
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_text = r#"
 Paw Measurement Tool - Keyboard & Mouse

 DOG INFO
   type             Edit the focused field
   Tab / arrows     Move between fields
   Enter            Start measuring

 IMAGES
   type a path      Bottom, side or front photo
   Enter            Load the image

 MEASURING
   drag             Draw a segment on the image
                    (first: 5 cm along the ruler)
   c / Enter        Confirm the view
   r                Rescale: clear this view
   u                Replace the image (before the
                    reference is drawn)

 OTHER
   e                Export CSV (summary)
   ? / F1           Toggle this help
   q / Ctrl+C       Quit application
"#;

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .title(" Help ")
                .title_style(Style::default().fg(Color::Cyan).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(help, popup_area);
}
