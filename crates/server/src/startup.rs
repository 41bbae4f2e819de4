use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use models::bootstrap;
use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn build_cors(permissive: bool) -> CorsLayer {
    if permissive { CorsLayer::very_permissive() } else { CorsLayer::new() }
}

/// Create the tables idempotently. Failure is logged; the service still
/// starts and reports storage problems through `/health`.
pub async fn init_schema(db: &DatabaseConnection) {
    match migration::Migrator::up(db, None).await {
        Ok(()) => info!("database schema ready"),
        Err(e) => error!(error = %e, "database schema initialization failed"),
    }
}

/// Router with the configured CORS policy.
pub fn app(state: ServerState, server: &ServerConfig) -> Router {
    routes::build_router(state, build_cors(server.cors_permissive))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Open storage, apply the schema and serve until interrupted.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let storage = bootstrap::open(&cfg.database).await?;
    if storage.status.degraded() {
        warn!(url = %storage.status.url, "starting in degraded mode");
    }
    init_schema(&storage.conn).await;

    let db = storage.conn.clone();
    let state = ServerState::new(storage.conn, storage.status, cfg.server.environment_tag());
    let router = app(state, &cfg.server);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, env = cfg.server.environment_tag(), "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    db.close().await?;
    info!("database connections closed");
    Ok(())
}
