//! Pure geometry shared by the drawing machine, the canvas and the quiz.
//!
//! Boxes are stored the way they were drawn: an anchor plus a signed
//! offset to the pointer. Everything that renders or hit-tests a box goes
//! through [`normalize`] so the four drag directions behave identically.

use serde::{Deserialize, Serialize};

use crate::constants::layout;

/// A 2D point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A normalized rectangle: non-negative size, `left`/`top` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Normalize an anchor + signed offset into a displayable rectangle.
pub fn normalize(x: f32, y: f32, width: f32, height: f32) -> Rect {
    Rect {
        left: x.min(x + width),
        top: y.min(y + height),
        width: width.abs(),
        height: height.abs(),
    }
}

/// Hit test a point against an already normalized rectangle.
pub fn point_in_box(point: Point, rect: &Rect) -> bool {
    rect.contains(point)
}

/// Convert a client (window) pointer position into canvas-relative coordinates.
///
/// `origin` is the top-left corner of the canvas element in client space.
pub fn to_canvas(client: Point, origin: Point) -> Point {
    Point::new(client.x - origin.x, client.y - origin.y)
}

/// Size of the displayed image in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

/// Margins used when fitting the image into the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBounds {
    pub horizontal_margin: f32,
    pub vertical_margin: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self {
            horizontal_margin: layout::HORIZONTAL_MARGIN,
            vertical_margin: layout::VERTICAL_MARGIN,
            max_width: layout::MAX_WIDTH,
            max_height: layout::MAX_HEIGHT,
        }
    }
}

/// Fit a 4:3 image into the viewport minus fixed margins.
///
/// Recomputed whenever the window is resized.
pub fn fit_display(
    viewport_width: f32,
    viewport_height: f32,
    bounds: &LayoutBounds,
) -> DisplaySize {
    let avail_w = (viewport_width - bounds.horizontal_margin)
        .min(bounds.max_width)
        .max(0.0);
    let avail_h = (viewport_height - bounds.vertical_margin)
        .min(bounds.max_height)
        .max(0.0);

    let width = avail_w.min(avail_h * layout::ASPECT_RATIO);
    DisplaySize {
        width,
        height: width / layout::ASPECT_RATIO,
    }
}
