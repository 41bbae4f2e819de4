use std::collections::BTreeMap;

use axum::{extract::State, Json};
use common::{env::redacted_env, types::Banner};
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::OpenApi;

use models::{db, StorageStatus};
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct StorageHealth {
    pub state: &'static str,
    pub backend: &'static str,
    pub attempts: u32,
    pub degraded: bool,
}

impl From<&StorageStatus> for StorageHealth {
    fn from(s: &StorageStatus) -> Self {
        Self { state: s.state.as_str(), backend: s.backend, attempts: s.attempts, degraded: s.degraded() }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_result: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub storage: StorageHealth,
}

#[utoipa::path(
    get, path = "/", tag = "system",
    responses((status = 200, description = "Service banner", body = crate::openapi::BannerDoc))
)]
pub async fn root(State(state): State<ServerState>) -> Json<Banner> {
    let env: BTreeMap<String, String> = redacted_env()
        .into_iter()
        .map(|(k, v)| {
            let v = if v.contains("://") { db::redact_url(&v) } else { v };
            (k, v)
        })
        .collect();
    debug!(?env, "environment snapshot");
    Json(Banner::new(state.environment.as_ref()))
}

#[utoipa::path(
    get, path = "/health", tag = "system",
    responses((status = 200, description = "Database liveness, always 200", body = crate::openapi::HealthDoc))
)]
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    let storage = StorageHealth::from(state.storage.as_ref());
    match db::ping(&state.db).await {
        Ok(value) => Json(Health { status: "healthy", database: "connected", test_result: Some(value), error: None, storage }),
        Err(e) => {
            warn!(error = %e, "health check failed");
            Json(Health { status: "unhealthy", database: "disconnected", test_result: None, error: Some(e.to_string()), storage })
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
