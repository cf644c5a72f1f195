//! Image descriptors and checklist progress.

use serde::{Deserialize, Serialize};

use crate::model::{BoundingBox, ViolationDetail};

/// An image offered for annotation, with its expected violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationImage {
    pub id: String,
    pub image_path: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub violation_details: Vec<ViolationDetail>,
}

impl AnnotationImage {
    pub fn new(id: impl Into<String>, image_path: impl Into<String>) -> Self {
        let image_path = image_path.into();
        let image_name = image_path
            .rsplit('/')
            .next()
            .unwrap_or(image_path.as_str())
            .to_string();
        Self {
            id: id.into(),
            image_path,
            image_name,
            violation_details: Vec::new(),
        }
    }

    pub fn with_violation(mut self, detail: ViolationDetail) -> Self {
        self.violation_details.push(detail);
        self
    }

    /// Key used for this image in the annotation store.
    pub fn key(&self) -> &str {
        &self.id
    }

    pub fn violation(&self, name: &str) -> Option<&ViolationDetail> {
        self.violation_details.iter().find(|v| v.name == name)
    }

    /// Checklist entries no box has been tagged with yet.
    pub fn unannotated<'a>(
        &'a self,
        boxes: &'a [BoundingBox],
    ) -> impl Iterator<Item = &'a ViolationDetail> + 'a {
        self.violation_details
            .iter()
            .filter(move |v| !is_violation_annotated(&v.name, boxes))
    }

    pub fn progress(&self, boxes: &[BoundingBox]) -> ChecklistProgress {
        let entries: Vec<ChecklistEntry> = self
            .violation_details
            .iter()
            .map(|v| ChecklistEntry {
                name: v.name.clone(),
                severity: v.severity,
                annotated: is_violation_annotated(&v.name, boxes),
            })
            .collect();
        ChecklistProgress { entries }
    }
}

/// A violation counts as annotated iff some box carries its name.
pub fn is_violation_annotated(name: &str, boxes: &[BoundingBox]) -> bool {
    boxes.iter().any(|b| b.violation_name == name)
}

/// One sidebar row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistEntry {
    pub name: String,
    pub severity: crate::model::Severity,
    pub annotated: bool,
}

/// Annotation progress of one image against its checklist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChecklistProgress {
    pub entries: Vec<ChecklistEntry>,
}

impl ChecklistProgress {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn annotated(&self) -> usize {
        self.entries.iter().filter(|e| e.annotated).count()
    }

    /// Every listed violation has a box. An empty checklist is never complete.
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.annotated() == self.total()
    }

    /// Sidebar heading, e.g. "Violations to Annotate (1)".
    pub fn heading(&self) -> String {
        format!("Violations to Annotate ({})", self.total())
    }
}
