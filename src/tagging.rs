//! Violation tagging dialog.
//!
//! Opened for every completed box. In fixed-list mode the choices come from
//! the session's [`IssueCatalog`]; in checklist mode they are the image's
//! violations that no box carries yet, and a brand-new violation may be
//! defined instead. Cancelling drops the pending box entirely.

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::model::{
    AnnotationImage, BoundingBox, IssueCatalog, PendingBox, Severity, ViolationDetail,
};

/// Where the label vocabulary comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggingMode {
    /// Global, extensible issue list
    FixedList,
    /// The current image's unannotated violations
    #[default]
    Checklist,
}

/// One selectable label in the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TagChoice {
    pub value: String,
    pub label: String,
    pub color: [u8; 3],
}

impl TagChoice {
    pub fn from_catalog(catalog: &IssueCatalog) -> Vec<Self> {
        catalog
            .issues()
            .map(|i| TagChoice {
                value: i.value.clone(),
                label: i.label.clone(),
                color: i.color,
            })
            .collect()
    }

    pub fn from_checklist(image: &AnnotationImage, boxes: &[BoundingBox]) -> Vec<Self> {
        image
            .unannotated(boxes)
            .map(|v| TagChoice {
                value: v.name.clone(),
                label: v.name.clone(),
                color: v.severity.color(),
            })
            .collect()
    }
}

/// Form for a violation the checklist does not list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewViolationForm {
    pub name: String,
    pub severity: String,
    pub description: String,
}

impl NewViolationForm {
    /// All three fields filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.severity.trim().is_empty()
            && !self.description.trim().is_empty()
    }

    fn build(&self) -> Result<ViolationDetail, StudioError> {
        if !self.is_complete() {
            return Err(StudioError::tagging_rejected(
                "name, severity and description are required",
            ));
        }
        let severity: Severity = self.severity.parse()?;
        Ok(ViolationDetail::new(self.name.trim(), severity, self.description.trim()).human_added())
    }
}

/// A confirmed tag: the box to commit and, in checklist mode, possibly a
/// new checklist entry to append to the image.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedBox {
    pub bbox: BoundingBox,
    pub added_violation: Option<ViolationDetail>,
}

/// The open tagging dialog for one pending box.
#[derive(Debug, Clone)]
pub struct TaggingDialog {
    pending: PendingBox,
    mode: TaggingMode,
    choices: Vec<TagChoice>,
    /// Names already on the checklist; a new violation may not reuse them
    existing_names: Vec<String>,
    selected: Option<String>,
    form: NewViolationForm,
}

impl TaggingDialog {
    pub fn open(
        pending: PendingBox,
        mode: TaggingMode,
        choices: Vec<TagChoice>,
        existing_names: Vec<String>,
    ) -> Self {
        log::debug!(
            "Tagging dialog for {} ({:?}, {} choices)",
            pending.id,
            mode,
            choices.len()
        );
        Self {
            pending,
            mode,
            choices,
            existing_names,
            selected: None,
            form: NewViolationForm::default(),
        }
    }

    pub fn mode(&self) -> TaggingMode {
        self.mode
    }

    pub fn pending(&self) -> &PendingBox {
        &self.pending
    }

    pub fn choices(&self) -> &[TagChoice] {
        &self.choices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Replace the choice list (after the catalog changed). A selection that
    /// no longer exists is dropped.
    pub fn refresh_choices(&mut self, choices: Vec<TagChoice>) {
        self.choices = choices;
        let stale = self
            .selected
            .as_ref()
            .is_some_and(|sel| !self.choices.iter().any(|c| &c.value == sel));
        if stale {
            self.selected = None;
        }
    }

    /// Select a label. Only labels on offer can be selected.
    pub fn select(&mut self, value: &str) -> bool {
        if self.choices.iter().any(|c| c.value == value) {
            self.selected = Some(value.to_string());
            true
        } else {
            log::debug!("Tagging: '{}' is not selectable", value);
            false
        }
    }

    pub fn form(&self) -> &NewViolationForm {
        &self.form
    }

    /// Edit the new-violation form. Only meaningful in checklist mode.
    pub fn form_mut(&mut self) -> &mut NewViolationForm {
        &mut self.form
    }

    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        self.selected.is_some()
            || (self.mode == TaggingMode::Checklist && self.form.is_complete())
    }

    /// Confirm the dialog. A selected label wins over a filled-in form.
    pub fn confirm(self) -> Result<TaggedBox, StudioError> {
        if let Some(label) = self.selected {
            return Ok(TaggedBox {
                bbox: self.pending.tag(label),
                added_violation: None,
            });
        }

        if self.mode != TaggingMode::Checklist {
            return Err(StudioError::tagging_rejected("no issue selected"));
        }

        let detail = self.form.build()?;
        if self.existing_names.iter().any(|n| *n == detail.name) {
            return Err(StudioError::tagging_rejected(format!(
                "violation '{}' is already on the checklist",
                detail.name
            )));
        }

        Ok(TaggedBox {
            bbox: self.pending.tag(detail.name.clone()),
            added_violation: Some(detail),
        })
    }
}
