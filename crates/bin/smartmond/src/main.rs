//! # smartmond, the smartmon daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct the assignment service, injecting repositories via port traits
//! - Build the axum router, injecting the service
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use smartmon_adapter_http_axum::state::AppState;
use smartmon_adapter_storage_sqlite_sqlx::{
    SqliteAssignmentRepository, SqliteLabelRepository, SqliteUnitOfWorkFactory,
};
use smartmon_app::services::assignment_service::AssignmentService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter()?)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "smartmond starting");

    // Database
    let db = smartmon_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let assignment_repo = SqliteAssignmentRepository::new(pool.clone());
    let label_repo = SqliteLabelRepository::new(pool.clone());
    let work_factory = SqliteUnitOfWorkFactory::new(pool);

    // Service
    let assignment_service = AssignmentService::new(assignment_repo, label_repo, work_factory);

    // HTTP
    let state = AppState::new(assignment_service)
        .with_default_page_size(config.pagination.default_page_size);
    let app = smartmon_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "smartmond listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("smartmond stopped");

    Ok(())
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
