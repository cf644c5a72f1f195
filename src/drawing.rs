//! Mouse-driven rectangle drawing.
//!
//! `Idle -> Drawing -> (Completed | Discarded)`. Pointer positions arrive in
//! client space together with the canvas origin; conversion to canvas
//! coordinates happens here, once.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_BOX_SIZE;
use crate::geometry::{self, Point};
use crate::model::{CurrentBox, PendingBox};

/// When a finished drag is too small to be a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardPolicy {
    /// Discard if either axis is below the minimum size
    #[default]
    EitherAxis,
    /// Discard only if both axes are below the minimum size
    BothAxes,
}

impl DiscardPolicy {
    pub fn is_too_small(&self, width: f32, height: f32, min_size: f32) -> bool {
        let narrow = width.abs() < min_size;
        let short = height.abs() < min_size;
        match self {
            DiscardPolicy::EitherAxis => narrow || short,
            DiscardPolicy::BothAxes => narrow && short,
        }
    }
}

/// State of the drawing machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// A drag is in progress.
    Drawing(CurrentBox),
}

/// Result of feeding one pointer event to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Event did not apply in the current state
    Ignored,
    Started,
    Updated,
    /// Drag ended below the minimum size; treated as a click
    Discarded,
    /// Drag ended with usable geometry, waiting for a tag
    Completed(PendingBox),
}

/// Tracks the single in-progress box.
#[derive(Debug, Clone)]
pub struct DrawingMachine {
    state: DrawingState,
    min_box_size: f32,
    policy: DiscardPolicy,
}

impl DrawingMachine {
    pub fn new(min_box_size: f32, policy: DiscardPolicy) -> Self {
        Self {
            state: DrawingState::Idle,
            min_box_size,
            policy,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing(_))
    }

    /// The box being dragged, if any.
    pub fn current(&self) -> Option<&CurrentBox> {
        match &self.state {
            DrawingState::Drawing(current) => Some(current),
            DrawingState::Idle => None,
        }
    }

    /// Pointer pressed over the canvas.
    pub fn pointer_down(&mut self, client: Point, canvas_origin: Point) -> DrawOutcome {
        if self.is_drawing() {
            return DrawOutcome::Ignored;
        }
        let anchor = geometry::to_canvas(client, canvas_origin);
        let current = CurrentBox::start(anchor);
        log::debug!(
            "Draw start {} at ({:.1}, {:.1})",
            current.id,
            anchor.x,
            anchor.y
        );
        self.state = DrawingState::Drawing(current);
        DrawOutcome::Started
    }

    /// Pointer moved; stretch the box from its anchor.
    pub fn pointer_move(&mut self, client: Point, canvas_origin: Point) -> DrawOutcome {
        match &mut self.state {
            DrawingState::Drawing(current) => {
                current.stretch_to(geometry::to_canvas(client, canvas_origin));
                DrawOutcome::Updated
            }
            DrawingState::Idle => DrawOutcome::Ignored,
        }
    }

    /// Pointer released; the box either completes or is discarded.
    pub fn pointer_up(&mut self) -> DrawOutcome {
        let DrawingState::Drawing(current) = std::mem::take(&mut self.state) else {
            return DrawOutcome::Ignored;
        };

        if self
            .policy
            .is_too_small(current.width, current.height, self.min_box_size)
        {
            log::debug!(
                "Draw discarded: {:.1}x{:.1} below {:.1}px",
                current.width,
                current.height,
                self.min_box_size
            );
            return DrawOutcome::Discarded;
        }

        log::debug!(
            "Draw complete {}: ({:.1}, {:.1}) {:+.1}x{:+.1}",
            current.id,
            current.x,
            current.y,
            current.width,
            current.height
        );
        DrawOutcome::Completed(current.freeze())
    }

    /// Abandon the drag without producing anything.
    pub fn cancel(&mut self) {
        if self.is_drawing() {
            log::debug!("Draw cancelled");
        }
        self.state = DrawingState::Idle;
    }
}

impl Default for DrawingMachine {
    fn default() -> Self {
        Self::new(MIN_BOX_SIZE, DiscardPolicy::default())
    }
}
