//! Backend collaborator interface.
//!
//! The HTTP layer lives outside this crate. The engine only needs the
//! [`AnnotationBackend`] trait and the JSON records in [`payload`]; a web
//! front end implements the trait over `fetch`, tests use an in-memory mock.

mod error;
pub mod payload;
pub mod request;

#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;

pub use error::ApiError;
pub use payload::{
    AnnotationRecord, BoxGeometry, DetailRecord, ValidationDecision, ValidationImage,
    ValidationPage, ViolationVerdict, image_url, rendered_url,
};
pub use request::{LoadState, RequestTracker, Section, Ticket};

use crate::model::AnnotationImage;

/// Remote operations the annotation engine depends on.
pub trait AnnotationBackend {
    /// `GET /images-for-annotation?employeeId=...`
    fn fetch_images(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = Result<Vec<AnnotationImage>, ApiError>>;

    /// `POST /annotations` for one image.
    fn submit_annotations(
        &self,
        record: &AnnotationRecord,
    ) -> impl Future<Output = Result<(), ApiError>>;

    /// `GET /validation-queue?page&limit`
    fn fetch_validation_queue(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<ValidationPage, ApiError>>;

    /// `POST` review decisions for one image.
    fn submit_validation(
        &self,
        decision: &ValidationDecision,
    ) -> impl Future<Output = Result<(), ApiError>>;
}
