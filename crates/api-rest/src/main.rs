//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, over empty in-memory backends.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the
//! REST server (with OpenAPI/Swagger UI) and no seeded data. The workspace's
//! main `prm-run` binary additionally loads a user seed file.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use prm_core::memory::{
    MemoryOrderNotifier, MemoryPendingActions, MemoryRepresentationStore, MemoryUserDirectory,
};
use prm_core::RepresentativesService;

/// Main entry point for the PRM REST API server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000) with OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `PRM_REST_ADDR`: Server address (default: "0.0.0.0:3000")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PRM_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting PRM REST API on {}", addr);

    let service = RepresentativesService::new(
        Arc::new(MemoryRepresentationStore::new()),
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(MemoryOrderNotifier::new()),
        Arc::new(MemoryPendingActions::new()),
    );
    let state = AppState {
        representatives: Arc::new(service),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
