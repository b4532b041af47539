//! Image canvas: fitting, hit testing and overlay rendering
//!
//! The source image is never rasterised into the terminal. The canvas is a
//! box with the image's aspect ratio in which segments are drawn in image
//! coordinates. Terminal cells are roughly twice as tall as wide, so one
//! cell spans 1 x 2 screen units to keep the display scale uniform.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::canvas::{Canvas, Line as CanvasLine, Rectangle},
};

use super::colors::{draft_color, measurement_color};
use crate::geometry::{DisplayScale, Point};
use crate::wizard::{ImageInfo, OverlayItem, Session};

/// Screen units per terminal row
pub const CELL_ASPECT: f64 = 2.0;

/// Where the active image sits on screen and at what scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// Terminal cells covered by the canvas
    pub area: Rect,
    pub image_width: u32,
    pub image_height: u32,
    pub scale: DisplayScale,
}

impl CanvasLayout {
    /// Fit an image into `available`, anchored at its top-left corner.
    /// Returns `None` when there is no room to show it.
    pub fn fit(available: Rect, image: &ImageInfo) -> Option<Self> {
        if available.width == 0 || available.height == 0 {
            return None;
        }
        let scale = DisplayScale::fit(
            image.width,
            image.height,
            available.width as f64,
            available.height as f64 * CELL_ASPECT,
        )?;
        let cols = (image.width as f64 * scale.factor()).ceil() as u16;
        let rows = (image.height as f64 * scale.factor() / CELL_ASPECT).ceil() as u16;
        Some(Self {
            area: Rect::new(
                available.x,
                available.y,
                cols.clamp(1, available.width),
                rows.clamp(1, available.height),
            ),
            image_width: image.width,
            image_height: image.height,
            scale,
        })
    }

    /// Check if a terminal cell is inside the canvas
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.area.x
            && col < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Screen-unit position of the centre of a terminal cell
    pub fn screen_point(&self, col: u16, row: u16) -> Point {
        Point::new(
            col.saturating_sub(self.area.x) as f64 + 0.5,
            (row.saturating_sub(self.area.y) as f64 + 0.5) * CELL_ASPECT,
        )
    }

    /// Screen-unit extent covered by the canvas cells
    fn bounds(&self) -> (f64, f64) {
        (
            self.area.width as f64,
            self.area.height as f64 * CELL_ASPECT,
        )
    }
}

/// Draw the image frame, recorded measurements and the segment being dragged
pub fn render_canvas(frame: &mut Frame, layout: &CanvasLayout, session: &Session) {
    let (x_max, y_max) = layout.bounds();
    let overlay = session.overlay();
    let scale = layout.scale;
    let (w, h) = (
        layout.image_width as f64 * scale.factor(),
        layout.image_height as f64 * scale.factor(),
    );
    // Canvas y grows upward, image y grows downward
    let flip = move |p: Point| {
        let p = scale.to_screen(p);
        (p.x, y_max - p.y)
    };

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([0.0, y_max])
        .paint(move |ctx| {
            ctx.draw(&Rectangle {
                x: 0.0,
                y: y_max - h,
                width: w,
                height: h,
                color: Color::DarkGray,
            });

            for item in &overlay {
                let (segment, color, label) = match item {
                    OverlayItem::Measurement(m) => {
                        (m.segment, measurement_color(m.kind), Some(m.to_string()))
                    }
                    OverlayItem::Draft(segment) => (*segment, draft_color(), None),
                };
                let (x1, y1) = flip(segment.start);
                let (x2, y2) = flip(segment.end);
                ctx.draw(&CanvasLine {
                    x1,
                    y1,
                    x2,
                    y2,
                    color,
                });
                if let Some(label) = label {
                    let (mx, my) = flip(segment.midpoint());
                    ctx.print(mx, my, Span::styled(label, Style::default().fg(color).bold()));
                }
            }
        });

    frame.render_widget(canvas, layout.area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            source: PathBuf::from("paw.jpg"),
            width,
            height,
        }
    }

    #[test]
    fn test_fit_large_image() {
        let layout = CanvasLayout::fit(Rect::new(2, 3, 100, 40), &image(2000, 1000)).unwrap();
        // width limits: 100 / 2000 = 0.05; height would allow 80 / 1000 = 0.08
        assert!((layout.scale.factor() - 0.05).abs() < 1e-12);
        assert_eq!(layout.area, Rect::new(2, 3, 100, 25));
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let layout = CanvasLayout::fit(Rect::new(0, 0, 100, 40), &image(20, 10)).unwrap();
        assert_eq!(layout.scale, DisplayScale::IDENTITY);
        assert_eq!(layout.area, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_hit_testing_and_screen_points() {
        let layout = CanvasLayout::fit(Rect::new(10, 5, 100, 40), &image(200, 100)).unwrap();
        assert!(layout.contains(10, 5));
        assert!(!layout.contains(9, 5));
        assert!(!layout.contains(10 + layout.area.width, 5));

        let p = layout.screen_point(12, 6);
        assert_eq!(p, Point::new(2.5, 3.0));
    }

    #[test]
    fn test_cell_distance_maps_to_image_pixels() {
        let layout = CanvasLayout::fit(Rect::new(0, 0, 50, 50), &image(1000, 1000)).unwrap();
        let a = layout.scale.to_image(layout.screen_point(0, 0));
        let b = layout.scale.to_image(layout.screen_point(10, 0));
        // 10 columns at 0.05 screen units per pixel
        assert!((a.distance(&b) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_layout_without_room() {
        assert!(CanvasLayout::fit(Rect::new(0, 0, 0, 10), &image(4000, 3000)).is_none());
        assert!(CanvasLayout::fit(Rect::new(0, 0, 10, 0), &image(4000, 3000)).is_none());
    }

    #[test]
    fn test_narrow_box_keeps_true_scale() {
        // One column still measures at the fitted scale, not at 1:1
        let layout = CanvasLayout::fit(Rect::new(0, 0, 1, 10), &image(4000, 3000)).unwrap();
        assert!((layout.scale.factor() - 0.00025).abs() < 1e-12);
        assert_eq!(layout.area, Rect::new(0, 0, 1, 1));
    }
}
