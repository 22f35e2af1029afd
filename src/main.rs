use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use prm_core::memory::{
    MemoryOrderNotifier, MemoryPendingActions, MemoryRepresentationStore, MemoryUserDirectory,
};
use prm_core::{RepresentativesService, User};

/// Main entry point for the PRM application.
///
/// Starts the REST server for the patient representative workflow, backed by
/// the in-memory reference implementations of the relationship store, user
/// directory, order notifier and pending-actions collaborators.
///
/// # Environment Variables
/// - `PRM_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PRM_USERS_FILE`: Optional path to a JSON array of users used to seed
///   the in-memory user directory at startup
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("prm=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PRM_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting PRM REST on {}", rest_addr);

    let users = Arc::new(MemoryUserDirectory::new());
    if let Ok(seed_path) = std::env::var("PRM_USERS_FILE") {
        let count = seed_users(&users, Path::new(&seed_path)).await?;
        tracing::info!("++ Seeded {} users from {}", count, seed_path);
    }

    let service = RepresentativesService::new(
        Arc::new(MemoryRepresentationStore::new()),
        users,
        Arc::new(MemoryOrderNotifier::new()),
        Arc::new(MemoryPendingActions::new()),
    );
    let state = AppState {
        representatives: Arc::new(service),
    };

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

/// Loads a JSON array of users into the in-memory directory.
async fn seed_users(directory: &MemoryUserDirectory, path: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read users file {}: {e}", path.display()))?;
    let users: Vec<User> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse users file {}: {e}", path.display()))?;

    let count = users.len();
    for user in users {
        directory.add(user).await;
    }
    Ok(count)
}
