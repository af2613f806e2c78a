//! Assignment: a named network endpoint under monitoring.

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, ValidationError};
use crate::id::AssignmentId;
use crate::label;

/// Minimum number of characters in an assignment name.
pub const NAME_MIN_LEN: usize = 4;
/// Maximum number of characters in an assignment name.
pub const NAME_MAX_LEN: usize = 30;

/// A stored monitoring assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub name: String,
    pub port: u16,
    pub maintainer: Option<String>,
}

impl Assignment {
    /// Return a copy with `update` applied, or `None` when nothing would change.
    ///
    /// A port outside `1..=65535` is treated as "not provided"; a port or
    /// maintainer equal to the stored value is not a change.
    #[must_use]
    pub fn merged(&self, update: &AssignmentUpdate) -> Option<Self> {
        let mut next = self.clone();
        let mut changed = false;

        if let Some(maintainer) = &update.maintainer
            && self.maintainer.as_ref() != Some(maintainer)
        {
            next.maintainer = Some(maintainer.clone());
            changed = true;
        }

        if let Some(port) = update.usable_port()
            && port != self.port
        {
            next.port = port;
            changed = true;
        }

        changed.then_some(next)
    }
}

/// Check the assignment name length (in characters).
///
/// # Errors
///
/// Returns [`ValidationError::NameLength`] outside `4..=30` characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let actual = name.chars().count();
    if (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&actual) {
        Ok(())
    } else {
        Err(ValidationError::NameLength {
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
            actual,
        })
    }
}

/// Narrow an untrusted port number to `u16`.
///
/// # Errors
///
/// Returns [`ValidationError::PortOutOfRange`] outside `0..=65535`.
pub fn parse_port(port: i64) -> Result<u16, ValidationError> {
    u16::try_from(port).map_err(|_| ValidationError::PortOutOfRange(port))
}

/// Check that the maintainer looks like an e-mail address: exactly one `@`,
/// neither first nor last.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMaintainer`] otherwise.
pub fn validate_maintainer(maintainer: &str) -> Result<(), ValidationError> {
    let mut parts = maintainer.split('@');
    let shaped = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if shaped {
        Ok(())
    } else {
        Err(ValidationError::InvalidMaintainer(maintainer.to_string()))
    }
}

/// A validated request to create an assignment together with its labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub name: String,
    pub port: u16,
    pub maintainer: Option<String>,
    pub labels: Vec<String>,
}

impl NewAssignment {
    /// Create a builder for constructing a [`NewAssignment`].
    #[must_use]
    pub fn builder() -> NewAssignmentBuilder {
        NewAssignmentBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Validation`] when the name length, maintainer
    /// shape or any label length is invalid.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validate_name(&self.name)?;
        if let Some(maintainer) = &self.maintainer {
            validate_maintainer(maintainer)?;
        }
        for description in &self.labels {
            label::validate_description(description)?;
        }
        Ok(())
    }
}

/// Step-by-step builder for [`NewAssignment`].
#[derive(Debug, Default)]
pub struct NewAssignmentBuilder {
    name: Option<String>,
    port: Option<i64>,
    maintainer: Option<String>,
    labels: Vec<String>,
}

impl NewAssignmentBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: i64) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = Some(maintainer.into());
        self
    }

    #[must_use]
    pub fn label(mut self, description: impl Into<String>) -> Self {
        self.labels.push(description.into());
        self
    }

    #[must_use]
    pub fn labels<I, S>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(descriptions.into_iter().map(Into::into));
        self
    }

    /// Consume the builder, validate, and return a [`NewAssignment`].
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Validation`] if `name` or `port` is missing or
    /// any field is invalid.
    pub fn build(self) -> Result<NewAssignment, MonitorError> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        let port = self.port.ok_or(ValidationError::MissingField("port"))?;
        let assignment = NewAssignment {
            name,
            port: parse_port(port)?,
            maintainer: self.maintainer,
            labels: self.labels,
        };
        assignment.validate()?;
        Ok(assignment)
    }
}

/// A partial update of an assignment.
///
/// Update payloads are never rejected: values that cannot be applied are
/// skipped by [`Assignment::merged`]. `labels`, when present and non-empty,
/// replaces the whole label set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentUpdate {
    pub port: Option<i64>,
    pub maintainer: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl AssignmentUpdate {
    /// Create a builder for constructing an [`AssignmentUpdate`].
    #[must_use]
    pub fn builder() -> AssignmentUpdateBuilder {
        AssignmentUpdateBuilder::default()
    }

    /// The requested port, if it is a usable one (`1..=65535`).
    #[must_use]
    pub fn usable_port(&self) -> Option<u16> {
        self.port
            .and_then(|port| u16::try_from(port).ok())
            .filter(|port| *port >= 1)
    }

    /// The replacement label set, if this update replaces labels at all.
    #[must_use]
    pub fn replacement_labels(&self) -> Option<&[String]> {
        self.labels.as_deref().filter(|labels| !labels.is_empty())
    }
}

/// Step-by-step builder for [`AssignmentUpdate`].
#[derive(Debug, Default)]
pub struct AssignmentUpdateBuilder {
    port: Option<i64>,
    maintainer: Option<String>,
    labels: Option<Vec<String>>,
}

impl AssignmentUpdateBuilder {
    #[must_use]
    pub fn port(mut self, port: i64) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.maintainer = Some(maintainer.into());
        self
    }

    #[must_use]
    pub fn labels<I, S>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(descriptions.into_iter().map(Into::into).collect());
        self
    }

    /// Consume the builder and return an [`AssignmentUpdate`].
    #[must_use]
    pub fn build(self) -> AssignmentUpdate {
        AssignmentUpdate {
            port: self.port,
            maintainer: self.maintainer,
            labels: self.labels,
        }
    }
}
