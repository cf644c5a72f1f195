//! In-memory backend used by unit tests.

use std::cell::{Cell, RefCell};
use std::future::{Future, ready};

use super::{AnnotationBackend, AnnotationRecord, ApiError, ValidationDecision, ValidationPage};
use crate::model::AnnotationImage;

/// Records every call; can be told to fail submissions.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub images: Vec<AnnotationImage>,
    pub queue: RefCell<ValidationPage>,
    pub submitted: RefCell<Vec<AnnotationRecord>>,
    pub decisions: RefCell<Vec<ValidationDecision>>,
    /// Fail this many upcoming submissions with a network error
    pub fail_next: Cell<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(count: usize) -> Self {
        let backend = Self::default();
        backend.fail_next.set(count);
        backend
    }

    fn take_failure(&self) -> Option<ApiError> {
        let remaining = self.fail_next.get();
        if remaining == 0 {
            return None;
        }
        self.fail_next.set(remaining - 1);
        Some(ApiError::Network("connection refused".into()))
    }
}

impl AnnotationBackend for MockBackend {
    fn fetch_images(
        &self,
        _employee_id: &str,
    ) -> impl Future<Output = Result<Vec<AnnotationImage>, ApiError>> {
        ready(Ok(self.images.clone()))
    }

    fn submit_annotations(
        &self,
        record: &AnnotationRecord,
    ) -> impl Future<Output = Result<(), ApiError>> {
        let result = match self.take_failure() {
            Some(e) => Err(e),
            None => {
                self.submitted.borrow_mut().push(record.clone());
                Ok(())
            }
        };
        ready(result)
    }

    fn fetch_validation_queue(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<ValidationPage, ApiError>> {
        let mut result = self.queue.borrow().clone();
        result.page = page;
        result.limit = limit;
        ready(Ok(result))
    }

    fn submit_validation(
        &self,
        decision: &ValidationDecision,
    ) -> impl Future<Output = Result<(), ApiError>> {
        let result = match self.take_failure() {
            Some(e) => Err(e),
            None => {
                self.decisions.borrow_mut().push(decision.clone());
                Ok(())
            }
        };
        ready(result)
    }
}
