//! Image navigation and bulk submission.

use crate::api::{AnnotationBackend, AnnotationRecord};
use crate::error::StudioError;
use crate::model::AnnotationImage;
use crate::store::BoxStore;

/// Index into the image list, clamped to `[0, total - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    index: usize,
    total: usize,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Move forward one image. Returns `true` if the index changed.
    pub fn next(&mut self) -> bool {
        self.step(1)
    }

    /// Move back one image. Returns `true` if the index changed.
    pub fn previous(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> bool {
        if self.total == 0 {
            return false;
        }
        let target = self
            .index
            .saturating_add_signed(delta)
            .min(self.total - 1);
        let changed = target != self.index;
        self.index = target;
        changed
    }

    pub fn go_to(&mut self, index: usize) -> Result<bool, StudioError> {
        if index >= self.total {
            return Err(StudioError::IndexOutOfRange {
                index,
                total: self.total,
            });
        }
        let changed = index != self.index;
        self.index = index;
        Ok(changed)
    }
}

/// Outcome of a bulk submission.
#[derive(Debug, Default)]
pub struct SubmitReport {
    /// Image keys accepted by the backend (and cleared locally)
    pub submitted: Vec<String>,
    /// Image keys that failed; their boxes stay in the store for a retry
    pub failed: Vec<(String, String)>,
}

impl SubmitReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Submit the boxes of one image. On success its store entry is cleared;
/// on failure the boxes stay so the user can retry without redrawing.
pub async fn submit_image<S, B>(
    store: &mut S,
    backend: &B,
    image: &AnnotationImage,
) -> Result<(), StudioError>
where
    S: BoxStore + ?Sized,
    B: AnnotationBackend + ?Sized,
{
    let boxes = store.get(image.key());
    if boxes.is_empty() {
        return Err(StudioError::NothingToSubmit);
    }
    let record = AnnotationRecord::from_image(image, boxes);
    log::info!(
        "Submitting {} boxes for image '{}'",
        record.boxes.len(),
        image.key()
    );
    backend.submit_annotations(&record).await?;
    store.clear(image.key());
    Ok(())
}

/// Submit every image that holds boxes. Failures are collected per image
/// rather than aborting the batch.
pub async fn submit_all<S, B>(
    store: &mut S,
    backend: &B,
    images: &[AnnotationImage],
) -> Result<SubmitReport, StudioError>
where
    S: BoxStore + ?Sized,
    B: AnnotationBackend + ?Sized,
{
    let keys = store.annotated_keys();
    if keys.is_empty() {
        return Err(StudioError::NothingToSubmit);
    }

    let mut report = SubmitReport::default();
    for key in keys {
        let Some(image) = images.iter().find(|i| i.key() == key) else {
            log::warn!("Skipping boxes for unknown image '{}'", key);
            continue;
        };
        match submit_image(store, backend, image).await {
            Ok(()) => report.submitted.push(key),
            Err(e) => {
                log::warn!("Submission failed for '{}': {}", key, e);
                report.failed.push((key, e.to_string()));
            }
        }
    }
    log::info!(
        "Submission finished: {} ok, {} failed",
        report.submitted.len(),
        report.failed.len()
    );
    Ok(report)
}
