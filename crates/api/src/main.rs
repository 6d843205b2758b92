use std::net::SocketAddr;
use std::sync::Arc;

use mechgraph_store::{GraphStore, MemoryGraphStore, PgGraphStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mechgraph_api::config::ServerConfig;
use mechgraph_api::router::build_app_router;
use mechgraph_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mechgraph_api=debug,mechgraph_store=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, store = ?config.store, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn GraphStore> = if config.store.is_memory() {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        Arc::new(MemoryGraphStore::new())
    } else {
        let pool = mechgraph_db::create_pool(&config.store.url, config.store.max_connections)
            .await
            .expect("Failed to connect to database");
        tracing::info!("Database connection pool created");

        mechgraph_db::health_check(&pool)
            .await
            .expect("Database health check failed");
        tracing::info!("Database health check passed");

        mechgraph_db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");

        Arc::new(PgGraphStore::new(pool))
    };

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM, then cancel `shutdown` so in-flight store
/// calls stop waiting on the backend.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    shutdown.cancel();
}
