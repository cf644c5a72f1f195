//! Administrator review of human-added violations.
//!
//! Same reveal/decide shape as the quiz, but decisions are posted to the
//! backend instead of scored locally. A validated image leaves the queue.

use std::collections::HashMap;

use crate::api::{
    AnnotationBackend, DetailRecord, Section, ValidationDecision, ValidationImage, ValidationPage,
    ViolationVerdict,
};
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::geometry::{self, Point};

/// Accept or reject one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn is_valid(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

/// Paged queue of images awaiting review.
#[derive(Debug)]
pub struct ValidationQueue {
    page: u32,
    limit: u32,
    section: Section<ValidationPage>,
    images: Vec<ValidationImage>,
    total: usize,
    current: usize,
    /// Decisions for the current image, by violation name
    decisions: HashMap<String, Decision>,
    /// Candidate whose box was clicked
    revealed: Option<String>,
}

impl ValidationQueue {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            section: Section::new(),
            images: Vec::new(),
            total: 0,
            current: 0,
            decisions: HashMap::new(),
            revealed: None,
        }
    }

    /// Queue paged by the configured page size.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.preferences.validation_page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as usize) as u32
    }

    pub fn section(&self) -> &Section<ValidationPage> {
        &self.section
    }

    pub fn images(&self) -> &[ValidationImage] {
        &self.images
    }

    pub fn current(&self) -> Option<&ValidationImage> {
        self.images.get(self.current)
    }

    /// Fetch a page. A failed fetch keeps the previous images on screen.
    pub async fn load_page<B: AnnotationBackend + ?Sized>(&mut self, backend: &B, page: u32) {
        let ticket = self.section.begin();
        let result = backend.fetch_validation_queue(page, self.limit).await;
        if !self.section.finish(ticket, result) {
            return;
        }
        if let Some(data) = self.section.state().data() {
            self.page = data.page;
            self.total = data.total;
            self.images = data.images.clone();
            self.select(0);
            log::info!(
                "Validation queue page {}: {} images ({} total)",
                self.page,
                self.images.len(),
                self.total
            );
        }
    }

    /// Stop an in-flight fetch (view closed or filters changed).
    pub fn cancel_fetch(&mut self) {
        self.section.cancel();
    }

    /// Switch images; pending decisions for the previous one are discarded.
    pub fn select(&mut self, index: usize) {
        self.current = index.min(self.images.len().saturating_sub(1));
        self.decisions.clear();
        self.revealed = None;
    }

    pub fn candidates(&self) -> Vec<&DetailRecord> {
        self.current()
            .map(|img| img.candidates().collect())
            .unwrap_or_default()
    }

    /// Reveal the candidate whose box contains the click.
    pub fn reveal_at(&mut self, point: Point) -> Option<&str> {
        let name = self
            .candidates()
            .into_iter()
            .find(|d| {
                d.bounding_box.is_some_and(|b| {
                    geometry::point_in_box(point, &geometry::normalize(b.x, b.y, b.width, b.height))
                })
            })
            .map(|d| d.violation_name.clone());
        self.revealed = name;
        self.revealed.as_deref()
    }

    pub fn revealed(&self) -> Option<&str> {
        self.revealed.as_deref()
    }

    /// Record a decision for one candidate of the current image.
    pub fn decide(&mut self, violation_name: &str, decision: Decision) -> bool {
        let known = self
            .candidates()
            .iter()
            .any(|d| d.violation_name == violation_name);
        if !known {
            log::warn!("No review candidate named '{}'", violation_name);
            return false;
        }
        self.decisions.insert(violation_name.to_string(), decision);
        true
    }

    pub fn decision(&self, violation_name: &str) -> Option<Decision> {
        self.decisions.get(violation_name).copied()
    }

    /// All candidates of the current image have a decision.
    pub fn is_ready(&self) -> bool {
        let candidates = self.candidates();
        !candidates.is_empty()
            && candidates
                .iter()
                .all(|d| self.decisions.contains_key(&d.violation_name))
    }

    /// Post the decisions for the current image. On success the image is
    /// removed from the queue; on failure decisions stay for a retry.
    pub async fn submit<B: AnnotationBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<ValidationDecision, StudioError> {
        if !self.is_ready() {
            return Err(StudioError::NothingToSubmit);
        }
        let image_id = self
            .current()
            .map(|img| img.id.clone())
            .ok_or(StudioError::NothingToSubmit)?;

        let verdicts = self
            .candidates()
            .iter()
            .filter_map(|d| {
                self.decisions.get(&d.violation_name).map(|dec| ViolationVerdict {
                    violation_name: d.violation_name.clone(),
                    is_valid: dec.is_valid(),
                })
            })
            .collect();
        let decision = ValidationDecision { image_id, verdicts };

        backend.submit_validation(&decision).await?;
        log::info!("Validated image '{}'", decision.image_id);

        self.images.remove(self.current);
        self.total = self.total.saturating_sub(1);
        self.select(self.current);

        // Page drained but the queue is not; the backend shifts later
        // images onto this page.
        if self.images.is_empty() && self.total > 0 {
            let page = self.page.min(self.page_count()).max(1);
            self.load_page(backend, page).await;
        }
        Ok(decision)
    }
}
