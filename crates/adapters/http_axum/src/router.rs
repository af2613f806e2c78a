//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use smartmon_app::ports::{AssignmentRepository, LabelRepository, UnitOfWorkFactory};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the assignment API and the `/health` probe. A [`TraceLayer`] logs
/// each request/response at the `DEBUG` level, and a [`CatchPanicLayer`]
/// turns handler panics into a `500` JSON body.
pub fn build<AR, LR, UF>(state: AppState<AR, LR, UF>) -> Router
where
    AR: AssignmentRepository + Send + Sync + 'static,
    LR: LabelRepository + Send + Sync + 'static,
    UF: UnitOfWorkFactory + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(CatchPanicLayer::custom(crate::error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
