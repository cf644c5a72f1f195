//! JSON records exchanged with the annotation backend.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::{AnnotationImage, BoundingBox, ViolationDetail};

/// Axis-aligned geometry as the backend stores it (normalized).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Rect> for BoxGeometry {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.left,
            y: rect.top,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// One checklist entry of a submitted image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub violation_name: String,
    #[serde(default)]
    pub description: String,
    /// Present once a box marks this violation
    #[serde(default)]
    pub bounding_box: Option<BoxGeometry>,
    #[serde(default)]
    pub is_human_added: bool,
    /// `None` until an administrator reviewed it
    #[serde(default)]
    pub is_valid: Option<bool>,
}

impl DetailRecord {
    fn from_violation(detail: &ViolationDetail, boxes: &[BoundingBox]) -> Self {
        Self {
            violation_name: detail.name.clone(),
            description: detail.description.clone(),
            bounding_box: boxes
                .iter()
                .find(|b| b.violation_name == detail.name)
                .map(|b| b.rect().into()),
            is_human_added: detail.is_human_added,
            is_valid: None,
        }
    }
}

/// Submission body for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub image_id: String,
    pub image_path: String,
    /// Boxes exactly as drawn
    pub boxes: Vec<BoundingBox>,
    /// Per-violation view of the same boxes
    pub details: Vec<DetailRecord>,
}

impl AnnotationRecord {
    /// Build the record for an image from its committed boxes.
    ///
    /// Boxes whose tag is not on the checklist (fixed-list issues) are still
    /// sent in `boxes` but produce no detail entry.
    pub fn from_image(image: &AnnotationImage, boxes: &[BoundingBox]) -> Self {
        Self {
            image_id: image.id.clone(),
            image_path: image.image_path.clone(),
            boxes: boxes.to_vec(),
            details: image
                .violation_details
                .iter()
                .map(|v| DetailRecord::from_violation(v, boxes))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// An image waiting for administrator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationImage {
    pub id: String,
    pub image_path: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub details: Vec<DetailRecord>,
}

impl ValidationImage {
    /// Human-added violations that still need a decision.
    pub fn candidates(&self) -> impl Iterator<Item = &DetailRecord> {
        self.details
            .iter()
            .filter(|d| d.is_human_added && d.is_valid.is_none())
    }
}

/// One page of the validation queue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPage {
    pub images: Vec<ValidationImage>,
    /// Total images in the queue across all pages
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

/// Accept/reject decision for one violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationVerdict {
    pub violation_name: String,
    pub is_valid: bool,
}

/// Review result posted for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDecision {
    pub image_id: String,
    pub verdicts: Vec<ViolationVerdict>,
}

fn join_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        url.push('/');
        url.push_str(part.trim_matches('/'));
    }
    url
}

/// URL of the raw image: `{base}/{imagePath}`.
pub fn image_url(base_url: &str, image_path: &str) -> String {
    join_url(base_url, &[image_path])
}

/// URL of the rendered, already-annotated image:
/// `{base}/boundingBox/{employeeId}/{imagePath}`.
pub fn rendered_url(base_url: &str, employee_id: &str, image_path: &str) -> String {
    join_url(base_url, &["boundingBox", employee_id, image_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    #[test]
    fn test_record_from_image() {
        let image = AnnotationImage::new("img-7", "site/a.jpg")
            .with_violation(ViolationDetail::new("missing_helmet", Severity::High, "helmet"))
            .with_violation(ViolationDetail::new("no_vest", Severity::Low, "vest"))
            .with_violation(
                ViolationDetail::new("blocked_exit", Severity::Critical, "exit").human_added(),
            );
        let boxes = vec![
            BoundingBox::new(100.0, 100.0, -60.0, -40.0, "missing_helmet"),
            BoundingBox::new(5.0, 5.0, 20.0, 20.0, "blocked_exit"),
        ];

        let record = AnnotationRecord::from_image(&image, &boxes);
        assert_eq!(record.boxes.len(), 2);
        assert_eq!(record.details.len(), 3);
        assert_eq!(
            record.details[0].bounding_box,
            Some(BoxGeometry {
                x: 40.0,
                y: 60.0,
                width: 60.0,
                height: 40.0
            })
        );
        assert_eq!(record.details[1].bounding_box, None);
        assert!(record.details[2].is_human_added);
        assert_eq!(record.details[2].is_valid, None);
    }

    #[test]
    fn test_record_json_field_names() {
        let image = AnnotationImage::new("img-1", "a.jpg")
            .with_violation(ViolationDetail::new("x", Severity::Low, "d"));
        let boxes = vec![BoundingBox::new(1.0, 2.0, 3.0, 4.0, "x")];
        let json = AnnotationRecord::from_image(&image, &boxes)
            .to_json()
            .expect("serializable");
        assert!(json.contains("\"imageId\":\"img-1\""));
        assert!(json.contains("\"violationName\":\"x\""));
        assert!(json.contains("\"boundingBox\""));
        assert!(json.contains("\"isHumanAdded\":false"));
        assert!(json.contains("\"isValid\":null"));
    }

    #[test]
    fn test_validation_candidates() {
        let json = r#"{
            "id": "v1",
            "imagePath": "q/a.jpg",
            "details": [
                {"violationName": "a", "isHumanAdded": true},
                {"violationName": "b", "isHumanAdded": false},
                {"violationName": "c", "isHumanAdded": true, "isValid": true}
            ]
        }"#;
        let image: ValidationImage = serde_json::from_str(json).expect("valid image");
        let names: Vec<_> = image.candidates().map(|d| d.violation_name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            image_url("http://api.local/", "/uploads/a.jpg"),
            "http://api.local/uploads/a.jpg"
        );
        assert_eq!(
            rendered_url("http://api.local", "emp-9", "uploads/a.jpg"),
            "http://api.local/boundingBox/emp-9/uploads/a.jpg"
        );
    }
}
