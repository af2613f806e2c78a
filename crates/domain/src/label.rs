//! Label: a free-text tag owned by exactly one assignment.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{AssignmentId, LabelId};

/// Maximum number of characters in a label description.
pub const DESCRIPTION_MAX_LEN: usize = 30;

/// A stored label row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub assignment_id: AssignmentId,
    pub description: String,
}

/// Check the label description length (in characters).
///
/// # Errors
///
/// Returns [`ValidationError::LabelTooLong`] above 30 characters.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::LabelTooLong {
            description: description.to_string(),
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}
