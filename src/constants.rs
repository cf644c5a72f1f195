//! Global constants for the annotation engine

use std::time::Duration;

/// Minimum width/height (canvas pixels) for a drag to count as a box.
pub const MIN_BOX_SIZE: f32 = 5.0;

/// Magnification factor of the zoom lens.
pub const MAGNIFIER_SCALE: f32 = 2.2;

/// Diameter of the zoom lens in canvas pixels.
pub const MAGNIFIER_LENS_SIZE: f32 = 150.0;

/// How long quiz answer feedback stays on screen before auto-dismissing.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(1000);

/// Number of options offered per quiz question (correct answer included).
pub const QUIZ_CHOICES: usize = 4;

/// Accent color given to issues defined during a session.
pub const CUSTOM_ISSUE_COLOR: [u8; 3] = [139, 92, 246];

/// Fallback color for boxes whose label cannot be resolved.
pub const DEFAULT_BOX_COLOR: [u8; 3] = [107, 114, 128];

/// Quiz feedback colors.
pub mod feedback {
    pub const CORRECT: [u8; 3] = [34, 197, 94];
    pub const INCORRECT: [u8; 3] = [239, 68, 68];
}

/// Display layout for the annotation canvas.
pub mod layout {
    /// Width over height of the displayed image.
    pub const ASPECT_RATIO: f32 = 4.0 / 3.0;
    /// Space reserved beside the canvas (sidebar + padding).
    pub const HORIZONTAL_MARGIN: f32 = 360.0;
    /// Space reserved above/below the canvas (header + controls).
    pub const VERTICAL_MARGIN: f32 = 200.0;
    pub const MAX_WIDTH: f32 = 1200.0;
    pub const MAX_HEIGHT: f32 = 900.0;
}
