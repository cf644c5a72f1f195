//! Violation checklist entries and severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BOX_COLOR;
use crate::error::StudioError;

/// How serious a violation is. Closed set; unknown strings are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    pub fn all() -> &'static [Severity] {
        &[
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
    }

    /// Border/label color for boxes tagged with a violation of this severity.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Severity::Critical => [127, 29, 29],
            Severity::High => [220, 38, 38],
            Severity::Medium => [249, 115, 22],
            Severity::Low => [202, 138, 4],
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            _ => Err(StudioError::UnknownSeverity(s.to_string())),
        }
    }
}

/// A violation an annotator is expected to locate in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDetail {
    /// Unique within one image's checklist
    pub name: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    /// Added by an annotator/administrator rather than the detector
    #[serde(default)]
    pub is_human_added: bool,
}

impl ViolationDetail {
    pub fn new(
        name: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            severity,
            description: description.into(),
            is_human_added: false,
        }
    }

    pub fn human_added(mut self) -> Self {
        self.is_human_added = true;
        self
    }
}

/// Look up the display color for a tag against a checklist.
///
/// Tags missing from the checklist (stale state) get the neutral default.
pub fn severity_color(checklist: &[ViolationDetail], violation_name: &str) -> [u8; 3] {
    checklist
        .iter()
        .find(|v| v.name == violation_name)
        .map(|v| v.severity.color())
        .unwrap_or(DEFAULT_BOX_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!("High".parse::<Severity>().ok(), Some(Severity::High));
        assert_eq!(" low ".parse::<Severity>().ok(), Some(Severity::Low));
        assert!(matches!(
            "urgent".parse::<Severity>(),
            Err(StudioError::UnknownSeverity(s)) if s == "urgent"
        ));
    }

    #[test]
    fn test_unknown_severity_rejected_on_deserialize() {
        let json = r#"{"name":"x","severity":"urgent","description":""}"#;
        assert!(serde_json::from_str::<ViolationDetail>(json).is_err());
    }

    #[test]
    fn test_severity_colors_are_distinct() {
        let colors: Vec<_> = Severity::all().iter().map(|s| s.color()).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_severity_color_fallback() {
        let checklist = vec![ViolationDetail::new("no_vest", Severity::Medium, "")];
        assert_eq!(severity_color(&checklist, "no_vest"), Severity::Medium.color());
        assert_eq!(severity_color(&checklist, "ghost"), DEFAULT_BOX_COLOR);
    }

    #[test]
    fn test_violation_detail_camel_case() {
        let json = r#"{"name":"missing_helmet","severity":"high","description":"d","isHumanAdded":true}"#;
        let detail: ViolationDetail = serde_json::from_str(json).expect("valid detail");
        assert!(detail.is_human_added);
        assert_eq!(detail.severity, Severity::High);
    }
}
