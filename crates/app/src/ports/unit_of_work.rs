//! Unit-of-work port: transactional writes.
//!
//! A [`UnitOfWork`] is obtained from a [`UnitOfWorkFactory`]. Every write
//! issued through it becomes visible only after [`UnitOfWork::commit`];
//! [`UnitOfWork::rollback`] (or dropping the handle) discards them.

use std::future::Future;

use smartmon_domain::assignment::Assignment;
use smartmon_domain::error::MonitorError;
use smartmon_domain::id::{AssignmentId, LabelId};

/// Opens new units of work.
pub trait UnitOfWorkFactory {
    /// The handle type produced by [`begin`](Self::begin).
    type Work: UnitOfWork + Send;

    /// Start a new unit of work.
    fn begin(&self) -> impl Future<Output = Result<Self::Work, MonitorError>> + Send;
}

/// A transactional write handle.
pub trait UnitOfWork {
    /// Insert an assignment and return its store-assigned id.
    ///
    /// Fails with [`MonitorError::Conflict`] when the name is already taken.
    fn insert_assignment(
        &mut self,
        name: &str,
        port: u16,
        maintainer: Option<&str>,
    ) -> impl Future<Output = Result<AssignmentId, MonitorError>> + Send;

    /// Overwrite the stored port and maintainer of `assignment`.
    fn update_assignment(
        &mut self,
        assignment: &Assignment,
    ) -> impl Future<Output = Result<(), MonitorError>> + Send;

    /// Delete an assignment row. Its labels must already be gone.
    fn delete_assignment(
        &mut self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<(), MonitorError>> + Send;

    /// Insert a label owned by `assignment_id`.
    fn insert_label(
        &mut self,
        assignment_id: AssignmentId,
        description: &str,
    ) -> impl Future<Output = Result<LabelId, MonitorError>> + Send;

    /// Delete every label owned by `assignment_id`.
    fn delete_labels(
        &mut self,
        assignment_id: AssignmentId,
    ) -> impl Future<Output = Result<(), MonitorError>> + Send;

    /// Make every write issued through this handle durable.
    fn commit(self) -> impl Future<Output = Result<(), MonitorError>> + Send;

    /// Discard every write issued through this handle.
    fn rollback(self) -> impl Future<Output = Result<(), MonitorError>> + Send;
}
