//! Data models for the annotation engine.

mod bounding_box;
mod image;
mod issue;
mod violation;

pub use bounding_box::{BoundingBox, CurrentBox, PendingBox, new_box_id};
pub use image::{AnnotationImage, ChecklistEntry, ChecklistProgress, is_violation_annotated};
pub use issue::{Issue, IssueCatalog, default_issues, slugify};
pub use violation::{Severity, ViolationDetail, severity_color};
