// paw-measure/src/geometry.rs

//! Points, segments and display scaling
//!
//! All recorded geometry lives in image-pixel coordinates. Pointer input
//! arrives in screen units and is divided by the [`DisplayScale`] before it
//! is stored, so lengths do not depend on how the image was zoomed.

/// A 2D point, x to the right and y downward
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A finished two-endpoint segment in image-pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Length in image pixels
    pub fn pixel_length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// True when both endpoints coincide
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// A segment being dragged: a start point and, once the pointer moved, an end
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentDraft {
    pub start: Point,
    pub end: Option<Point>,
}

impl SegmentDraft {
    pub fn begin(start: Point) -> Self {
        Self { start, end: None }
    }

    pub fn extend(&mut self, to: Point) {
        self.end = Some(to);
    }

    /// The finished segment, if the drag produced a second point
    pub fn finish(&self) -> Option<Segment> {
        self.end.map(|end| Segment::new(self.start, end))
    }
}

/// Screen units per image pixel
///
/// A scale of 0.5 means the image is shown at half size, so a screen
/// distance of 50 units covers 100 image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale(f64);

impl DisplayScale {
    pub const IDENTITY: DisplayScale = DisplayScale(1.0);

    /// Returns `None` for non-finite or non-positive factors
    pub fn new(factor: f64) -> Option<Self> {
        if factor.is_finite() && factor > 0.0 {
            Some(Self(factor))
        } else {
            None
        }
    }

    /// Largest scale that fits an image into the given screen box, never
    /// enlarging it past its native size.
    /// Returns `None` for an empty box or an empty image.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        max_width: f64,
        max_height: f64,
    ) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let factor = (max_width / image_width as f64)
            .min(max_height / image_height as f64)
            .min(1.0);
        Self::new(factor)
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    /// Convert a screen point into image-pixel coordinates
    pub fn to_image(&self, screen: Point) -> Point {
        Point::new(screen.x / self.0, screen.y / self.0)
    }

    /// Convert an image-pixel point into screen coordinates
    pub fn to_screen(&self, image: Point) -> Point {
        Point::new(image.x * self.0, image.y * self.0)
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_length_is_euclidean() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert!((seg.pixel_length() - 50.0).abs() < 1e-12);
        assert_eq!(seg.midpoint(), Point::new(15.0, 20.0));
    }

    #[test]
    fn test_draft_needs_second_point() {
        let mut draft = SegmentDraft::begin(Point::new(1.0, 2.0));
        assert!(draft.finish().is_none());
        draft.extend(Point::new(4.0, 6.0));
        let seg = draft.finish().unwrap();
        assert!((seg.pixel_length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_screen_to_image_divides_out_scale() {
        let half = DisplayScale::new(0.5).unwrap();
        let a = half.to_image(Point::new(10.0, 10.0));
        let b = half.to_image(Point::new(60.0, 10.0));
        let seg_half = Segment::new(a, b);

        let full = DisplayScale::IDENTITY;
        let seg_full = Segment::new(
            full.to_image(Point::new(20.0, 20.0)),
            full.to_image(Point::new(120.0, 20.0)),
        );

        assert!((seg_half.pixel_length() - seg_full.pixel_length()).abs() < 1e-12);
        assert_eq!(half.to_screen(a), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_fit_never_enlarges() {
        assert_eq!(
            DisplayScale::fit(300, 200, 600.0, 600.0),
            Some(DisplayScale::IDENTITY)
        );
        let s = DisplayScale::fit(1200, 600, 600.0, 600.0).unwrap();
        assert!((s.factor() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fit_has_no_scale_for_empty_boxes() {
        assert!(DisplayScale::fit(4000, 3000, 0.0, 20.0).is_none());
        assert!(DisplayScale::fit(4000, 3000, 20.0, 0.0).is_none());
        assert!(DisplayScale::fit(0, 10, 100.0, 100.0).is_none());
    }

    #[test]
    fn test_rejects_bad_factors() {
        assert!(DisplayScale::new(0.0).is_none());
        assert!(DisplayScale::new(-1.0).is_none());
        assert!(DisplayScale::new(f64::NAN).is_none());
    }
}
