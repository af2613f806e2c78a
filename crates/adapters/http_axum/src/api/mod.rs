//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod assignments;

use axum::Router;
use axum::routing::get;

use smartmon_app::ports::{AssignmentRepository, LabelRepository, UnitOfWorkFactory};

use crate::state::AppState;

/// Build the `/services` sub-router.
pub fn routes<AR, LR, UF>() -> Router<AppState<AR, LR, UF>>
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/services",
            get(assignments::list::<AR, LR, UF>).post(assignments::create::<AR, LR, UF>),
        )
        .route(
            "/services/{name}",
            get(assignments::get::<AR, LR, UF>)
                .put(assignments::update::<AR, LR, UF>)
                .delete(assignments::delete::<AR, LR, UF>),
        )
}
