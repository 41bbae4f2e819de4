//! Storage bootstrap: connect to the primary database with bounded retries,
//! then fall back to the embedded file database.

use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use configs::DatabaseConfig;

use crate::db::{self, Backend};
use crate::retry::{retry_with_policy, RetryPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Retrying,
    Connected,
    FallbackActive,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Retrying => "retrying",
            Self::Connected => "connected",
            Self::FallbackActive => "fallback_active",
        }
    }
}

/// Snapshot of how storage was obtained; reported by the health endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct StorageStatus {
    pub state: ConnectionState,
    pub backend: &'static str,
    /// Redacted URL of the active database.
    pub url: String,
    /// Attempts made against the primary database.
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl StorageStatus {
    pub fn degraded(&self) -> bool {
        self.state == ConnectionState::FallbackActive
    }
}

#[derive(Debug)]
pub struct Storage {
    pub conn: DatabaseConnection,
    pub status: StorageStatus,
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("primary database unavailable after {attempts} attempts ({primary}); fallback failed: {fallback}")]
    FallbackFailed { attempts: u32, primary: String, fallback: DbErr },
}

fn backend_name(url: &str) -> &'static str {
    Backend::from_url(url).map(|b| b.as_str()).unwrap_or("unknown")
}

/// Open storage per the configured primary URL, retrying with a fixed
/// interval; after the last failed attempt switch to `fallback_url`.
#[instrument(skip(cfg), fields(max_retries = cfg.max_retries))]
pub async fn open(cfg: &DatabaseConfig) -> Result<Storage, ConnectError> {
    let primary = cfg.primary_url();
    let redacted = db::redact_url(&db::normalize_url(primary));
    let backend = backend_name(primary);
    info!(url = %redacted, backend, "connecting to database");

    let policy = RetryPolicy::new(cfg.max_retries, cfg.retry_interval());
    let mut state = ConnectionState::Connecting;
    let outcome = retry_with_policy(
        &policy,
        |attempt, err: &DbErr| {
            state = ConnectionState::Retrying;
            warn!(attempt, max = policy.max_attempts(), error = %err, "database connection attempt failed");
        },
        || db::connect_once(primary, cfg),
    )
    .await;

    match outcome {
        Ok((conn, attempts)) => {
            info!(attempts, previous = state.as_str(), "database connection established");
            Ok(Storage {
                conn,
                status: StorageStatus {
                    state: ConnectionState::Connected,
                    backend,
                    url: redacted,
                    attempts,
                    last_error: None,
                },
            })
        }
        Err(exhausted) => {
            let primary_error = exhausted.last_error.to_string();
            error!(attempts = exhausted.attempts, error = %primary_error, "all database connection attempts failed, switching to fallback");
            open_fallback(cfg, exhausted.attempts, primary_error).await
        }
    }
}

async fn open_fallback(cfg: &DatabaseConfig, attempts: u32, primary_error: String) -> Result<Storage, ConnectError> {
    let url = &cfg.fallback_url;
    let backend = backend_name(url);
    let redacted = db::redact_url(url);
    match db::connect_once(url, cfg).await {
        Ok(conn) => {
            warn!(url = %redacted, "running on fallback database");
            Ok(Storage {
                conn,
                status: StorageStatus {
                    state: ConnectionState::FallbackActive,
                    backend,
                    url: redacted,
                    attempts,
                    last_error: Some(primary_error),
                },
            })
        }
        Err(fallback) => {
            error!(url = %redacted, error = %fallback, "fallback database unavailable");
            Err(ConnectError::FallbackFailed { attempts, primary: primary_error, fallback })
        }
    }
}
