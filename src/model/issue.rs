//! Issue vocabulary for fixed-list tagging.
//!
//! Built-in issues are always present and cannot be removed; issues added
//! during a session get a slug derived from their label and a fixed accent color.

use serde::{Deserialize, Serialize};

use crate::constants::CUSTOM_ISSUE_COLOR;

/// A selectable issue label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Slug key stored on boxes
    pub value: String,
    /// Display label
    pub label: String,
    /// RGB color for boxes carrying this issue
    pub color: [u8; 3],
}

impl Issue {
    pub fn new(value: &str, label: &str, color: [u8; 3]) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            color,
        }
    }
}

/// Default issues every session starts with.
pub fn default_issues() -> Vec<Issue> {
    vec![
        Issue::new("pothole", "Pothole", [239, 68, 68]),
        Issue::new("crack", "Crack", [249, 115, 22]),
        Issue::new("debris", "Debris", [234, 179, 8]),
        Issue::new("marking", "Faded Marking", [59, 130, 246]),
        Issue::new("sign", "Damaged Sign", [16, 185, 129]),
        Issue::new("other", "Other", [107, 114, 128]),
    ]
}

/// Lowercase, trim, and replace whitespace runs with underscores.
pub fn slugify(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// The issue list offered in fixed-list mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCatalog {
    builtin: Vec<Issue>,
    custom: Vec<Issue>,
}

impl IssueCatalog {
    pub fn new(builtin: Vec<Issue>) -> Self {
        Self {
            builtin,
            custom: Vec::new(),
        }
    }

    /// Built-ins first, then custom issues in the order they were added.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn get(&self, value: &str) -> Option<&Issue> {
        self.issues().find(|i| i.value == value)
    }

    pub fn is_builtin(&self, value: &str) -> bool {
        self.builtin.iter().any(|i| i.value == value)
    }

    /// Define a custom issue from a user-entered label.
    ///
    /// Returns `None` for blank labels or slugs already in the catalog.
    pub fn add_custom(&mut self, label: &str) -> Option<&Issue> {
        let value = slugify(label);
        if value.is_empty() || self.get(&value).is_some() {
            log::debug!("Rejected custom issue '{}'", label);
            return None;
        }
        log::debug!("Added custom issue '{}' ({})", label.trim(), value);
        self.custom
            .push(Issue::new(&value, label.trim(), CUSTOM_ISSUE_COLOR));
        self.custom.last()
    }

    /// Remove a custom issue. Built-ins are immutable.
    pub fn remove_custom(&mut self, value: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|i| i.value != value);
        before != self.custom.len()
    }

    pub fn color_of(&self, value: &str) -> Option<[u8; 3]> {
        self.get(value).map(|i| i.color)
    }

    pub fn label_of(&self, value: &str) -> Option<&str> {
        self.get(value).map(|i| i.label.as_str())
    }
}

impl Default for IssueCatalog {
    fn default() -> Self {
        Self::new(default_issues())
    }
}
