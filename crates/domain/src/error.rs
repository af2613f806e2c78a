//! Common error types used across the workspace.
//!
//! Every failure the system can produce is a variant of [`MonitorError`].
//! Each layer defines its own typed errors and converts via `#[from]`, so the
//! transport layer can map variants to responses with an exhaustive `match`.

use std::fmt;

use crate::id::AssignmentId;

/// Top-level error for every smartmon operation.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Input rejected before reaching storage.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A looked-up record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A record with the same unique key already exists.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Opaque failure from the persistence layer.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent from the payload.
    #[error("the {0} field is required")]
    MissingField(&'static str),

    /// Assignment name outside the accepted length range.
    #[error("name must be between {min} and {max} characters, got {actual}")]
    NameLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// Port outside `0..=65535`.
    #[error("port must be between 0 and 65535, got {0}")]
    PortOutOfRange(i64),

    /// Maintainer is not an email-shaped string.
    #[error("maintainer is not a valid e-mail address: {0}")]
    InvalidMaintainer(String),

    /// Label description exceeds the maximum length.
    #[error("label must be at most {max} characters: {description}")]
    LabelTooLong { description: String, max: usize },

    /// Page size or page number below one.
    #[error("{field} must be at least 1, got {actual}")]
    InvalidPage { field: &'static str, actual: i64 },
}

/// The key a lookup was performed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Name(String),
    Id(AssignmentId),
    AssignmentId(AssignmentId),
    Description(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name:{name}"),
            Self::Id(id) => write!(f, "id:{id}"),
            Self::AssignmentId(id) => write!(f, "assignment id:{id}"),
            Self::Description(text) => write!(f, "description:{text}"),
        }
    }
}

/// A record could not be found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} is not found by {key}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub key: LookupKey,
}

/// An assignment with the requested name already exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Assignment with name {name} already exists")]
pub struct ConflictError {
    pub name: String,
}
