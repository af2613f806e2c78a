//! Shared application state for axum handlers.

use std::sync::Arc;

use smartmon_app::ports::{AssignmentRepository, LabelRepository, UnitOfWorkFactory};
use smartmon_app::services::assignment_service::AssignmentService;
use smartmon_domain::page::DEFAULT_PAGE_SIZE;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and unit-of-work types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<AR, LR, UF> {
    /// Assignment CRUD service.
    pub assignment_service: Arc<AssignmentService<AR, LR, UF>>,
    /// Page size used when a list request does not specify one.
    pub default_page_size: u32,
}

impl<AR, LR, UF> Clone for AppState<AR, LR, UF> {
    fn clone(&self) -> Self {
        Self {
            assignment_service: Arc::clone(&self.assignment_service),
            default_page_size: self.default_page_size,
        }
    }
}

impl<AR, LR, UF> AppState<AR, LR, UF>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(assignment_service: AssignmentService<AR, LR, UF>) -> Self {
        Self {
            assignment_service: Arc::new(assignment_service),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size applied when `pageSize` is omitted.
    #[must_use]
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }
}
