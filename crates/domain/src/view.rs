//! View: an assignment joined with the descriptions of its labels.

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::id::AssignmentId;
use crate::label::Label;

/// The shape returned to callers for a single assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: AssignmentId,
    pub name: String,
    pub port: u16,
    pub maintainer: Option<String>,
    pub labels: Vec<String>,
}

impl AssignmentView {
    /// Join `assignment` with the labels it owns.
    ///
    /// `labels` may contain rows of other assignments; only rows whose
    /// `assignment_id` matches are kept, in their original order.
    #[must_use]
    pub fn assemble(assignment: Assignment, labels: &[Label]) -> Self {
        let labels = labels
            .iter()
            .filter(|label| label.assignment_id == assignment.id)
            .map(|label| label.description.clone())
            .collect();

        Self {
            id: assignment.id,
            name: assignment.name,
            port: assignment.port,
            maintainer: assignment.maintainer,
            labels,
        }
    }
}
