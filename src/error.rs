//! Error types for nsconflict.
//!
//! All errors are strongly typed using thiserror. The detection algorithm
//! itself cannot fail; every error here is raised before a pass starts,
//! while the input snapshot is loaded or validated.

use thiserror::Error;

use crate::resource::ResourceId;

/// Validation errors raised for malformed input resources.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Resource namespace cannot be empty")]
    EmptyNamespace,

    #[error("Resource name cannot be empty (namespace '{namespace}')")]
    EmptyName {
        namespace: String,
    },

    #[error("Duplicate resource identifier: {id}")]
    DuplicateResource {
        id: ResourceId,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },
}

/// Top-level error type for nsconflict.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snapshot error: {message}")]
    Snapshot {
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Creates a snapshot error.
    #[must_use]
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a snapshot decoding error.
    #[must_use]
    pub const fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot { .. })
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::snapshot(err.to_string())
    }
}

/// Result type alias for nsconflict operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
