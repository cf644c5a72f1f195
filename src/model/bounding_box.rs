//! Bounding box types: persisted boxes, the in-progress drag and pending boxes.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, Rect};

/// Generate a fresh client-side box identifier.
pub fn new_box_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A committed annotation: geometry plus the violation it marks.
///
/// Geometry is kept exactly as drawn (anchor + signed offset), so `width`
/// and `height` may be negative. Use [`BoundingBox::rect`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Stable identifier for the lifetime of the box
    pub id: String,
    /// Anchor X (where the drag started)
    pub x: f32,
    /// Anchor Y (where the drag started)
    pub y: f32,
    /// Signed horizontal offset to the release point
    pub width: f32,
    /// Signed vertical offset to the release point
    pub height: f32,
    /// Violation (or issue) this box marks; empty means untagged
    #[serde(alias = "issue", default)]
    pub violation_name: String,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32, violation_name: impl Into<String>) -> Self {
        Self {
            id: new_box_id(),
            x,
            y,
            width,
            height,
            violation_name: violation_name.into(),
        }
    }

    /// Normalized display geometry.
    pub fn rect(&self) -> Rect {
        geometry::normalize(self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        geometry::point_in_box(point, &self.rect())
    }

    /// A box counts as annotated once it carries a non-blank tag.
    pub fn is_annotated(&self) -> bool {
        !self.violation_name.trim().is_empty()
    }
}

/// The box being dragged out right now. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CurrentBox {
    /// Start a zero-sized box anchored at `anchor`.
    pub fn start(anchor: Point) -> Self {
        Self {
            id: new_box_id(),
            x: anchor.x,
            y: anchor.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the box to the pointer; the anchor never moves.
    pub fn stretch_to(&mut self, pointer: Point) {
        self.width = pointer.x - self.x;
        self.height = pointer.y - self.y;
    }

    pub fn rect(&self) -> Rect {
        geometry::normalize(self.x, self.y, self.width, self.height)
    }

    /// Previews are only drawn once both axes have moved.
    pub fn is_visible(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }

    pub fn freeze(self) -> PendingBox {
        PendingBox {
            id: self.id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Completed geometry waiting for a violation tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PendingBox {
    pub fn rect(&self) -> Rect {
        geometry::normalize(self.x, self.y, self.width, self.height)
    }

    /// Attach a tag, producing the box that gets committed.
    pub fn tag(self, violation_name: impl Into<String>) -> BoundingBox {
        BoundingBox {
            id: self.id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            violation_name: violation_name.into(),
        }
    }
}
