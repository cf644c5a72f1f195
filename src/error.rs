//! Error types for annotation engine operations.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Errors raised by the annotation engine.
///
/// Rejected input (too-small drags, clicks while locked) is reported through
/// outcome enums instead; these variants cover operations the caller asked
/// for explicitly and that could not be carried out.
#[derive(Error, Debug)]
pub enum StudioError {
    /// A tagging dialog was confirmed without a usable label
    #[error("Tagging rejected: {reason}")]
    TaggingRejected {
        /// Why the dialog could not be confirmed
        reason: String,
    },

    /// Severity string outside the closed set
    #[error("Unknown severity '{0}' (expected critical, high, medium or low)")]
    UnknownSeverity(String),

    /// Navigation target outside the image list
    #[error("Image index {index} out of range (0..{total})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of images available
        total: usize,
    },

    /// Submission requested with no committed boxes
    #[error("Nothing to submit")]
    NothingToSubmit,

    /// Operation attempted while a dialog or feedback window holds the UI
    #[error("Interaction locked: {0}")]
    Locked(&'static str),

    /// Backend call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StudioError {
    /// Create a tagging rejection with a reason.
    pub fn tagging_rejected(reason: impl Into<String>) -> Self {
        Self::TaggingRejected {
            reason: reason.into(),
        }
    }
}
