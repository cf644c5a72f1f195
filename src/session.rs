//! Annotation session: the state machine behind the annotation canvas.
//!
//! Pointer and key events go in; the session routes them through the
//! drawing machine and the tagging dialog, commits tagged boxes to the
//! store, and hands the canvas a [`CanvasFrame`] to paint. The view layer
//! holds no behavior of its own.

use serde::Deserialize;

use crate::api::{AnnotationBackend, Section};
use crate::canvas::{Affordances, CanvasFrame, FrameInput, Magnifier, Palette, render_frame};
use crate::config::StudioConfig;
use crate::drawing::{DrawOutcome, DrawingMachine};
use crate::error::StudioError;
use crate::geometry::{self, DisplaySize, LayoutBounds, Point};
use crate::model::{AnnotationImage, BoundingBox, ChecklistProgress, Issue, IssueCatalog};
use crate::navigation::{self, Navigator, SubmitReport};
use crate::store::{AnnotationStore, BoxStore};
use crate::tagging::{TagChoice, TaggingDialog, TaggingMode};

/// Coarse state of the session, derived from its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for a new box
    Idle,
    /// A drag is in progress
    Drawing,
    /// A tagging dialog is open; the canvas is locked
    Tagging,
    /// Magnifier on; drawing disabled
    Zoom,
    /// Every checklist violation has a box
    Complete,
}

/// Keyboard shortcuts understood by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Enter,
    Left,
    Right,
    /// Toggle the magnifier
    Z,
}

/// Drives annotation of a list of images.
#[derive(Debug)]
pub struct AnnotationSession<S: BoxStore = AnnotationStore> {
    store: S,
    images: Vec<AnnotationImage>,
    images_section: Section<Vec<AnnotationImage>>,
    nav: Navigator,
    /// Boxes of the current image, mirrored from the store
    working: Vec<BoundingBox>,
    drawing: DrawingMachine,
    dialog: Option<TaggingDialog>,
    mode: TaggingMode,
    catalog: IssueCatalog,
    magnifier: Magnifier,
    layout: LayoutBounds,
    display: DisplaySize,
}

impl AnnotationSession<AnnotationStore> {
    pub fn new(config: &StudioConfig) -> Self {
        Self::with_store(AnnotationStore::new(), config)
    }
}

impl<S: BoxStore> AnnotationSession<S> {
    pub fn with_store(store: S, config: &StudioConfig) -> Self {
        let prefs = &config.preferences;
        Self {
            store,
            images: Vec::new(),
            images_section: Section::new(),
            nav: Navigator::new(0),
            working: Vec::new(),
            drawing: DrawingMachine::new(prefs.min_box_size, prefs.discard_policy),
            dialog: None,
            mode: prefs.tagging_mode,
            catalog: config.catalog(),
            magnifier: Magnifier::new(prefs.magnifier_scale, prefs.magnifier_lens_size),
            layout: prefs.layout,
            display: DisplaySize {
                width: 0.0,
                height: 0.0,
            },
        }
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Replace the image list and start at the first image.
    pub fn set_images(&mut self, images: Vec<AnnotationImage>) {
        self.flush();
        self.images = images;
        self.nav = Navigator::new(self.images.len());
        self.load_current();
        log::info!("Session has {} images", self.images.len());
    }

    /// Fetch the images assigned to an employee. On failure the current
    /// list stays and the error is reported through [`Self::images_section`].
    pub async fn load_images<B: AnnotationBackend + ?Sized>(
        &mut self,
        backend: &B,
        employee_id: &str,
    ) {
        let ticket = self.images_section.begin();
        let result = backend.fetch_images(employee_id).await;
        if self.images_section.finish(ticket, result) {
            if let Some(images) = self.images_section.state().data().cloned() {
                self.set_images(images);
            }
        }
    }

    /// Abort an in-flight image fetch.
    pub fn cancel_image_fetch(&mut self) {
        self.images_section.cancel();
    }

    pub fn images_section(&self) -> &Section<Vec<AnnotationImage>> {
        &self.images_section
    }

    pub fn images(&self) -> &[AnnotationImage] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.nav.index()
    }

    pub fn current_image(&self) -> Option<&AnnotationImage> {
        self.images.get(self.nav.index())
    }

    fn current_key(&self) -> Option<String> {
        self.current_image().map(|i| i.key().to_string())
    }

    fn load_current(&mut self) {
        self.working = match self.current_key() {
            Some(key) => self.store.get(&key).to_vec(),
            None => Vec::new(),
        };
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear the session down, flushing the current image first.
    pub fn into_store(mut self) -> S {
        self.flush();
        self.store
    }

    /// Committed boxes of the current image.
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.working
    }

    pub fn mode(&self) -> TaggingMode {
        self.mode
    }

    pub fn catalog(&self) -> &IssueCatalog {
        &self.catalog
    }

    pub fn dialog(&self) -> Option<&TaggingDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut TaggingDialog> {
        self.dialog.as_mut()
    }

    pub fn magnifier(&self) -> &Magnifier {
        &self.magnifier
    }

    pub fn state(&self) -> SessionState {
        if self.dialog.is_some() {
            SessionState::Tagging
        } else if self.drawing.is_drawing() {
            SessionState::Drawing
        } else if self.magnifier.is_active() {
            SessionState::Zoom
        } else if self.is_fully_annotated() {
            SessionState::Complete
        } else {
            SessionState::Idle
        }
    }

    /// Checklist progress of the current image.
    pub fn progress(&self) -> ChecklistProgress {
        self.current_image()
            .map(|img| img.progress(&self.working))
            .unwrap_or_default()
    }

    /// Only checklist mode has a notion of "done".
    pub fn is_fully_annotated(&self) -> bool {
        self.mode == TaggingMode::Checklist && self.progress().is_complete()
    }

    fn drawing_allowed(&self) -> bool {
        self.dialog.is_none()
            && !self.magnifier.is_active()
            && !self.is_fully_annotated()
            && self.current_image().is_some()
    }

    /// Submit is enabled once any image holds a committed box.
    pub fn can_submit(&self) -> bool {
        !self.working.is_empty() || !self.store.annotated_keys().is_empty()
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn pointer_down(&mut self, client: Point, canvas_origin: Point) -> DrawOutcome {
        if !self.drawing_allowed() {
            return DrawOutcome::Ignored;
        }
        self.drawing.pointer_down(client, canvas_origin)
    }

    pub fn pointer_move(&mut self, client: Point, canvas_origin: Point) -> DrawOutcome {
        if self.magnifier.is_active() {
            self.magnifier
                .track(geometry::to_canvas(client, canvas_origin), self.display);
            return DrawOutcome::Ignored;
        }
        self.drawing.pointer_move(client, canvas_origin)
    }

    /// Finish a drag. A completed box opens the tagging dialog.
    pub fn pointer_up(&mut self) -> DrawOutcome {
        let outcome = self.drawing.pointer_up();
        if let DrawOutcome::Completed(pending) = &outcome {
            self.open_dialog(pending.clone());
        }
        outcome
    }

    pub fn pointer_leave(&mut self) {
        self.magnifier.leave();
    }

    fn open_dialog(&mut self, pending: crate::model::PendingBox) {
        let (choices, existing) = match self.current_image() {
            Some(image) => (
                self.choices_for(image),
                image
                    .violation_details
                    .iter()
                    .map(|v| v.name.clone())
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        self.dialog = Some(TaggingDialog::open(pending, self.mode, choices, existing));
    }

    fn choices_for(&self, image: &AnnotationImage) -> Vec<TagChoice> {
        match self.mode {
            TaggingMode::FixedList => TagChoice::from_catalog(&self.catalog),
            TaggingMode::Checklist => TagChoice::from_checklist(image, &self.working),
        }
    }

    // ========================================================================
    // Tagging
    // ========================================================================

    pub fn select_tag(&mut self, value: &str) -> bool {
        self.dialog.as_mut().is_some_and(|d| d.select(value))
    }

    /// Define a custom issue; an open fixed-list dialog picks it up.
    pub fn add_custom_issue(&mut self, label: &str) -> Option<Issue> {
        let issue = self.catalog.add_custom(label).cloned()?;
        self.refresh_dialog();
        Some(issue)
    }

    pub fn remove_custom_issue(&mut self, value: &str) -> bool {
        let removed = self.catalog.remove_custom(value);
        if removed {
            self.refresh_dialog();
        }
        removed
    }

    fn refresh_dialog(&mut self) {
        if self.mode != TaggingMode::FixedList {
            return;
        }
        let choices = TagChoice::from_catalog(&self.catalog);
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.refresh_choices(choices);
        }
    }

    /// Confirm the open dialog and commit the box.
    ///
    /// A rejected confirmation leaves the dialog open.
    pub fn confirm_tag(&mut self) -> Result<&BoundingBox, StudioError> {
        let dialog = self
            .dialog
            .clone()
            .ok_or_else(|| StudioError::tagging_rejected("no dialog open"))?;
        if !dialog.can_confirm() {
            return Err(StudioError::tagging_rejected("no violation selected"));
        }
        let tagged = dialog.confirm()?;
        let key = self.current_key().ok_or(StudioError::NothingToSubmit)?;

        if let Some(added) = tagged.added_violation {
            log::info!("Added violation '{}' to checklist of '{}'", added.name, key);
            let index = self.nav.index();
            self.images[index].violation_details.push(added);
        }

        log::info!(
            "Committed box {} as '{}' on '{}'",
            tagged.bbox.id,
            tagged.bbox.violation_name,
            key
        );
        self.working.push(tagged.bbox);
        self.store.save(&key, self.working.clone());
        self.dialog = None;
        self.working.last().ok_or(StudioError::NothingToSubmit)
    }

    /// Close the dialog, discarding the pending box.
    pub fn cancel_tag(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            log::debug!("Tagging cancelled, dropped {}", dialog.pending().id);
        }
    }

    /// Delete a committed box from the current image.
    pub fn delete_box(&mut self, box_id: &str) -> bool {
        if self.dialog.is_some() {
            return false;
        }
        let before = self.working.len();
        self.working.retain(|b| b.id != box_id);
        if self.working.len() == before {
            return false;
        }
        if let Some(key) = self.current_key() {
            self.store.save(&key, self.working.clone());
        }
        log::debug!("Deleted box {}", box_id);
        true
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Returns `true` if the key did something.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => {
                if self.dialog.is_some() {
                    self.cancel_tag();
                    true
                } else if self.drawing.is_drawing() {
                    self.drawing.cancel();
                    true
                } else if self.magnifier.is_active() {
                    self.magnifier.set_active(false);
                    true
                } else {
                    false
                }
            }
            Key::Enter => {
                let ready = self.dialog.as_ref().is_some_and(TaggingDialog::can_confirm);
                ready && self.confirm_tag().is_ok()
            }
            Key::Left => self.dialog.is_none() && self.previous(),
            Key::Right => self.dialog.is_none() && self.next(),
            Key::Z => {
                if self.dialog.is_some() {
                    return false;
                }
                self.drawing.cancel();
                self.magnifier.toggle();
                true
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Persist the current image's boxes and drop transient state.
    ///
    /// Called before every navigation and on teardown. A dialog that already
    /// has a usable label is committed first; an untagged pending box or a
    /// half-drawn drag is discarded, exactly as if it had been cancelled.
    pub fn flush(&mut self) {
        self.drawing.cancel();
        if self.dialog.as_ref().is_some_and(TaggingDialog::can_confirm) {
            if let Err(e) = self.confirm_tag() {
                log::warn!("Pending box could not be committed: {}", e);
            }
        }
        self.cancel_tag();
        if let Some(key) = self.current_key() {
            self.store.save(&key, self.working.clone());
        }
    }

    pub fn next(&mut self) -> bool {
        self.flush();
        let moved = self.nav.next();
        if moved {
            self.load_current();
        }
        moved
    }

    pub fn previous(&mut self) -> bool {
        self.flush();
        let moved = self.nav.previous();
        if moved {
            self.load_current();
        }
        moved
    }

    pub fn go_to(&mut self, index: usize) -> Result<bool, StudioError> {
        self.flush();
        let moved = self.nav.go_to(index)?;
        if moved {
            self.load_current();
        }
        Ok(moved)
    }

    pub fn has_next(&self) -> bool {
        self.nav.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.nav.has_previous()
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submit the current image's boxes.
    pub async fn submit_current<B: AnnotationBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<(), StudioError> {
        self.flush();
        let index = self.nav.index();
        let image = self.images.get(index).ok_or(StudioError::NothingToSubmit)?;
        navigation::submit_image(&mut self.store, backend, image).await?;
        self.load_current();
        Ok(())
    }

    /// Submit every annotated image.
    pub async fn submit_all<B: AnnotationBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<SubmitReport, StudioError> {
        self.flush();
        let report = navigation::submit_all(&mut self.store, backend, &self.images).await?;
        self.load_current();
        Ok(report)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Recompute the display size after a window resize.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) -> DisplaySize {
        self.display = geometry::fit_display(viewport_width, viewport_height, &self.layout);
        self.display
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn frame(&self) -> CanvasFrame {
        let palette = match (self.mode, self.current_image()) {
            (TaggingMode::Checklist, Some(image)) => Palette::Checklist(&image.violation_details),
            (TaggingMode::Checklist, None) => Palette::Checklist(&[]),
            (TaggingMode::FixedList, _) => Palette::Issues(&self.catalog),
        };
        render_frame(FrameInput {
            boxes: &self.working,
            current: self.drawing.current(),
            palette,
            magnifier: &self.magnifier,
            display: self.display,
            locked: self.dialog.is_some(),
            fully_annotated: self.is_fully_annotated(),
            affordances: Affordances {
                has_previous: self.has_previous(),
                has_next: self.has_next(),
                can_submit: self.can_submit(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::model::{Severity, ViolationDetail};

    const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    fn config(mode: TaggingMode) -> StudioConfig {
        let mut config = StudioConfig::new();
        config.preferences.tagging_mode = mode;
        config
    }

    fn helmet_image(id: &str) -> AnnotationImage {
        AnnotationImage::new(id, format!("site/{id}.jpg")).with_violation(ViolationDetail::new(
            "missing_helmet",
            Severity::High,
            "Worker without helmet",
        ))
    }

    fn checklist_session() -> AnnotationSession {
        let mut session = AnnotationSession::new(&config(TaggingMode::Checklist));
        session.set_images(vec![helmet_image("img-0"), helmet_image("img-1")]);
        session.resize(1160.0, 800.0);
        session
    }

    fn draw(session: &mut AnnotationSession, from: (f32, f32), to: (f32, f32)) -> DrawOutcome {
        session.pointer_down(Point::new(from.0, from.1), ORIGIN);
        session.pointer_move(Point::new(to.0, to.1), ORIGIN);
        session.pointer_up()
    }

    #[test]
    fn test_helmet_scenario() {
        let mut session = checklist_session();
        assert_eq!(session.progress().heading(), "Violations to Annotate (1)");
        assert!(!session.can_submit());
        let controls = session.frame().affordances;
        assert!(!controls.can_submit);
        assert!(controls.has_next);
        assert!(!controls.has_previous);

        assert!(matches!(
            draw(&mut session, (100.0, 100.0), (150.0, 150.0)),
            DrawOutcome::Completed(_)
        ));
        assert_eq!(session.state(), SessionState::Tagging);
        assert!(session.select_tag("missing_helmet"));
        let committed = session.confirm_tag().cloned().expect("committed");
        assert_eq!(committed.violation_name, "missing_helmet");
        assert_eq!((committed.width, committed.height), (50.0, 50.0));

        let progress = session.progress();
        assert_eq!(progress.total(), 1);
        assert!(progress.entries[0].annotated);
        assert!(progress.is_complete());
        assert_eq!(session.state(), SessionState::Complete);
        assert!(session.can_submit());

        let frame = session.frame();
        assert!(frame.fully_annotated);
        assert!(!frame.drawing_enabled);
        assert_eq!(frame.boxes.len(), 1);
        assert_eq!(frame.boxes[0].color, Severity::High.color());
        assert!(frame.affordances.can_submit);

        // Complete images take no more boxes
        assert_eq!(
            session.pointer_down(Point::new(10.0, 10.0), ORIGIN),
            DrawOutcome::Ignored
        );
    }

    #[test]
    fn test_commit_only_touches_current_image() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        session.confirm_tag().expect("committed");

        assert_eq!(session.store().get("img-0").len(), 1);
        assert!(session.store().get("img-1").is_empty());
        assert_eq!(session.store().get("img-0")[0].violation_name, "missing_helmet");
    }

    #[test]
    fn test_small_drag_opens_no_dialog() {
        let mut session = checklist_session();
        assert_eq!(draw(&mut session, (10.0, 10.0), (12.0, 40.0)), DrawOutcome::Discarded);
        assert!(session.dialog().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_dialog_locks_drawing() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        assert_eq!(
            session.pointer_down(Point::new(100.0, 100.0), ORIGIN),
            DrawOutcome::Ignored
        );
        assert!(!session.frame().drawing_enabled);
    }

    #[test]
    fn test_cancel_discards_pending_box() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        assert!(session.handle_key(Key::Escape));
        assert!(session.dialog().is_none());
        assert!(session.boxes().is_empty());
        assert!(session.store().get("img-0").is_empty());
    }

    #[test]
    fn test_confirm_without_selection_keeps_dialog() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        assert!(session.confirm_tag().is_err());
        assert!(session.dialog().is_some());
        assert!(!session.handle_key(Key::Enter));
    }

    #[test]
    fn test_new_violation_extends_checklist() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        if let Some(dialog) = session.dialog_mut() {
            let form = dialog.form_mut();
            form.name = "blocked_exit".into();
            form.severity = "critical".into();
            form.description = "Exit blocked by pallets".into();
        }
        assert!(session.handle_key(Key::Enter));

        let image = session.current_image().expect("image");
        let added = image.violation("blocked_exit").expect("added to checklist");
        assert!(added.is_human_added);
        assert_eq!(session.progress().total(), 2);
        assert_eq!(session.progress().annotated(), 1);
        assert!(!session.is_fully_annotated());
    }

    #[test]
    fn test_next_twice_is_idempotent() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        session.confirm_tag().expect("committed");

        assert!(session.next());
        assert!(!session.next());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.store().get("img-0").len(), 1);
        assert!(session.store().get("img-1").is_empty());

        assert!(session.previous());
        assert_eq!(session.boxes().len(), 1);
    }

    #[test]
    fn test_navigation_commits_tagged_dialog() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        // Navigating is blocked by keys while the dialog is open
        assert!(!session.handle_key(Key::Right));
        // An explicit move flushes, which commits the labelled box
        assert!(session.next());
        assert!(session.dialog().is_none());
        assert_eq!(session.current_index(), 1);
        let kept = session.store().get("img-0");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].violation_name, "missing_helmet");
        assert!(session.boxes().is_empty());
    }

    #[test]
    fn test_navigation_drops_untagged_dialog() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        assert!(session.go_to(1).expect("in range"));
        assert!(session.dialog().is_none());
        assert!(session.store().get("img-0").is_empty());
    }

    #[test]
    fn test_fixed_list_mode_with_custom_issue() {
        let mut session = AnnotationSession::new(&config(TaggingMode::FixedList));
        session.set_images(vec![AnnotationImage::new("road-1", "roads/1.jpg")]);
        draw(&mut session, (100.0, 100.0), (40.0, 60.0));

        let issue = session.add_custom_issue("Oil Spill").expect("new issue");
        let offered = session
            .dialog()
            .map(|d| d.choices().iter().any(|c| c.value == issue.value))
            .unwrap_or(false);
        assert!(offered);
        assert!(session.select_tag("oil_spill"));
        session.confirm_tag().expect("committed");

        let frame = session.frame();
        assert_eq!(frame.boxes[0].label.as_deref(), Some("Oil Spill"));
        assert_eq!(frame.boxes[0].rect.left, 40.0);
        assert!(!session.remove_custom_issue("pothole"));
        assert!(!session.is_fully_annotated());
    }

    #[test]
    fn test_magnifier_blocks_drawing_and_tracks_pointer() {
        let mut session = checklist_session();
        assert!(session.handle_key(Key::Z));
        assert_eq!(session.state(), SessionState::Zoom);
        assert_eq!(
            session.pointer_down(Point::new(10.0, 10.0), ORIGIN),
            DrawOutcome::Ignored
        );
        session.pointer_move(Point::new(120.0, 80.0), ORIGIN);
        let lens = session.frame().lens.expect("lens visible");
        assert_eq!(lens.center, Point::new(120.0, 80.0));

        assert!(session.handle_key(Key::Escape));
        assert!(session.frame().lens.is_none());
    }

    #[test]
    fn test_delete_box_unannotates() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        let id = session.confirm_tag().map(|b| b.id.clone()).expect("committed");

        assert!(session.delete_box(&id));
        assert!(!session.is_fully_annotated());
        assert!(session.store().get("img-0").is_empty());
        assert!(!session.delete_box(&id));
    }

    #[test]
    fn test_submit_current_clears_store() {
        let mut session = checklist_session();
        let backend = MockBackend::new();
        assert!(matches!(
            pollster::block_on(session.submit_current(&backend)),
            Err(StudioError::NothingToSubmit)
        ));

        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        session.confirm_tag().expect("committed");
        pollster::block_on(session.submit_current(&backend)).expect("submitted");

        assert!(session.boxes().is_empty());
        assert!(!session.can_submit());
        assert_eq!(backend.submitted.borrow()[0].image_id, "img-0");
    }

    #[test]
    fn test_failed_submit_preserves_boxes() {
        let mut session = checklist_session();
        let backend = MockBackend::failing(1);
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        session.confirm_tag().expect("committed");

        assert!(pollster::block_on(session.submit_current(&backend)).is_err());
        assert_eq!(session.boxes().len(), 1);
        assert!(session.can_submit());
    }

    #[test]
    fn test_load_images_from_backend() {
        let mut backend = MockBackend::new();
        backend.images = vec![helmet_image("a"), helmet_image("b"), helmet_image("c")];
        let mut session = AnnotationSession::new(&StudioConfig::new());
        pollster::block_on(session.load_images(&backend, "emp-1"));
        assert_eq!(session.images().len(), 3);
        assert_eq!(session.current_image().map(|i| i.id.as_str()), Some("a"));
        assert!(session.images_section().state().data().is_some());
    }

    #[test]
    fn test_into_store_flushes() {
        let mut session = checklist_session();
        draw(&mut session, (10.0, 10.0), (60.0, 60.0));
        session.select_tag("missing_helmet");
        session.confirm_tag().expect("committed");
        let store = session.into_store();
        assert_eq!(store.annotated_image_count(), 1);
    }

    #[test]
    fn test_teardown_commits_tagged_dialog() {
        let mut session = checklist_session();
        draw(&mut session, (100.0, 100.0), (150.0, 150.0));
        session.select_tag("missing_helmet");
        let store = session.into_store();
        assert_eq!(store.get("img-0").len(), 1);
        assert_eq!(store.get("img-0")[0].width, 50.0);
    }

    #[test]
    fn test_teardown_drops_half_drawn_box() {
        let mut session = checklist_session();
        session.pointer_down(Point::new(10.0, 10.0), ORIGIN);
        session.pointer_move(Point::new(80.0, 80.0), ORIGIN);
        let store = session.into_store();
        assert!(store.is_empty());
    }
}
