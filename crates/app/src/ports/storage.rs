//! Storage port: read-side repository traits.
//!
//! Writes go through [`UnitOfWork`](super::UnitOfWork) so that multi-row
//! changes commit or roll back together.

use std::future::Future;

use smartmon_domain::assignment::Assignment;
use smartmon_domain::error::MonitorError;
use smartmon_domain::id::AssignmentId;
use smartmon_domain::label::Label;
use smartmon_domain::page::Page;

/// Repository for querying [`Assignment`]s.
pub trait AssignmentRepository {
    /// Get one page of assignments in store iteration order.
    fn get_page(
        &self,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Assignment>, MonitorError>> + Send;

    /// Get an assignment by its unique name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Assignment>, MonitorError>> + Send;

    /// Get an assignment by its identifier.
    fn get_by_id(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<Assignment>, MonitorError>> + Send;
}

/// Repository for querying [`Label`]s.
pub trait LabelRepository {
    /// Get every label of every assignment.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send;

    /// Get the labels whose description equals `description`.
    fn find_by_description(
        &self,
        description: &str,
    ) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send;

    /// Get the labels owned by an assignment.
    fn find_by_assignment_id(
        &self,
        assignment_id: AssignmentId,
    ) -> impl Future<Output = Result<Vec<Label>, MonitorError>> + Send;
}
