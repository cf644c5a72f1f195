//! Annotation Studio - bounding-box annotation engine
//!
//! Headless core of a browser annotation studio: drawing boxes over images,
//! tagging them with violations, per-image persistence, submission, and the
//! quiz and review workflows built on the same box model.

pub mod api;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod model;
pub mod navigation;
pub mod quiz;
pub mod review;
pub mod session;
pub mod store;
pub mod tagging;

pub use api::{AnnotationBackend, ApiError};
pub use config::{ConfigError, StudioConfig};
pub use error::StudioError;
pub use session::{AnnotationSession, Key, SessionState};
pub use store::{AnnotationStore, BoxStore};
