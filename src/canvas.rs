//! Render model for the annotation canvas.
//!
//! The canvas holds no behavior: [`render_frame`] turns session state into
//! a [`CanvasFrame`] that the UI layer paints as absolutely positioned
//! rectangles over the image, plus the optional zoom lens.

use crate::constants::{DEFAULT_BOX_COLOR, MAGNIFIER_LENS_SIZE, MAGNIFIER_SCALE};
use crate::geometry::{DisplaySize, Point, Rect};
use crate::model::{BoundingBox, CurrentBox, IssueCatalog, ViolationDetail, severity_color};

/// Resolves colors and labels for box tags.
#[derive(Debug, Clone, Copy)]
pub enum Palette<'a> {
    /// Color by the severity of the matching checklist entry
    Checklist(&'a [ViolationDetail]),
    /// Color by issue
    Issues(&'a IssueCatalog),
}

impl Palette<'_> {
    pub fn color(&self, tag: &str) -> [u8; 3] {
        match self {
            Palette::Checklist(checklist) => severity_color(checklist, tag),
            Palette::Issues(catalog) => catalog.color_of(tag).unwrap_or(DEFAULT_BOX_COLOR),
        }
    }

    /// Display label; unknown tags are shown verbatim.
    pub fn label(&self, tag: &str) -> String {
        match self {
            Palette::Checklist(_) => tag.to_string(),
            Palette::Issues(catalog) => catalog.label_of(tag).unwrap_or(tag).to_string(),
        }
    }
}

/// One rectangle to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOverlay {
    pub id: String,
    pub rect: Rect,
    pub color: [u8; 3],
    /// `None` for the in-progress preview
    pub label: Option<String>,
    pub dashed: bool,
}

impl BoxOverlay {
    pub fn committed(bbox: &BoundingBox, palette: &Palette<'_>) -> Self {
        Self {
            id: bbox.id.clone(),
            rect: bbox.rect(),
            color: palette.color(&bbox.violation_name),
            label: Some(palette.label(&bbox.violation_name)),
            dashed: false,
        }
    }

    /// The dashed preview, shown only once both axes have moved.
    pub fn preview(current: &CurrentBox) -> Option<Self> {
        current.is_visible().then(|| Self {
            id: current.id.clone(),
            rect: current.rect(),
            color: DEFAULT_BOX_COLOR,
            label: None,
            dashed: true,
        })
    }
}

/// Zoom lens state. While active, drawing is disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnifier {
    active: bool,
    pointer: Option<Point>,
    scale: f32,
    lens_size: f32,
}

impl Magnifier {
    pub fn new(scale: f32, lens_size: f32) -> Self {
        Self {
            active: false,
            pointer: None,
            scale,
            lens_size,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggle(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::debug!("Magnifier {}", if active { "on" } else { "off" });
        }
        self.active = active;
        if !active {
            self.pointer = None;
        }
    }

    /// Follow the pointer (canvas coordinates). Positions outside the
    /// displayed image hide the lens.
    pub fn track(&mut self, pointer: Point, display: DisplaySize) {
        if !self.active {
            return;
        }
        let inside = pointer.x >= 0.0
            && pointer.y >= 0.0
            && pointer.x <= display.width
            && pointer.y <= display.height;
        self.pointer = inside.then_some(pointer);
    }

    /// Pointer left the canvas.
    pub fn leave(&mut self) {
        self.pointer = None;
    }

    pub fn lens(&self, display: DisplaySize) -> Option<LensView> {
        let pointer = self.pointer.filter(|_| self.active)?;
        let half = self.lens_size / 2.0;
        Some(LensView {
            center: pointer,
            lens_size: self.lens_size,
            background_size: DisplaySize {
                width: display.width * self.scale,
                height: display.height * self.scale,
            },
            background_offset: Point::new(
                -(pointer.x * self.scale - half),
                -(pointer.y * self.scale - half),
            ),
        })
    }
}

impl Default for Magnifier {
    fn default() -> Self {
        Self::new(MAGNIFIER_SCALE, MAGNIFIER_LENS_SIZE)
    }
}

/// Magnified crop of the image, centered on the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct LensView {
    pub center: Point,
    pub lens_size: f32,
    /// Size of the scaled image drawn inside the lens
    pub background_size: DisplaySize,
    /// Offset of the scaled image relative to the lens' top-left corner
    pub background_offset: Point,
}

/// State of the navigation and submit controls around the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub has_previous: bool,
    pub has_next: bool,
    /// Any image holds a committed box
    pub can_submit: bool,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasFrame {
    pub display: DisplaySize,
    pub boxes: Vec<BoxOverlay>,
    pub preview: Option<BoxOverlay>,
    pub lens: Option<LensView>,
    /// Show the success overlay
    pub fully_annotated: bool,
    pub drawing_enabled: bool,
    pub affordances: Affordances,
}

/// Inputs to [`render_frame`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub boxes: &'a [BoundingBox],
    pub current: Option<&'a CurrentBox>,
    pub palette: Palette<'a>,
    pub magnifier: &'a Magnifier,
    pub display: DisplaySize,
    /// A dialog or feedback window holds the UI
    pub locked: bool,
    pub fully_annotated: bool,
    pub affordances: Affordances,
}

pub fn render_frame(input: FrameInput<'_>) -> CanvasFrame {
    CanvasFrame {
        display: input.display,
        boxes: input
            .boxes
            .iter()
            .map(|b| BoxOverlay::committed(b, &input.palette))
            .collect(),
        preview: input.current.and_then(BoxOverlay::preview),
        lens: input.magnifier.lens(input.display),
        fully_annotated: input.fully_annotated,
        drawing_enabled: !input.locked && !input.magnifier.is_active() && !input.fully_annotated,
        affordances: input.affordances,
    }
}
