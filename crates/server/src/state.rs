use std::sync::Arc;

use models::StorageStatus;
use sea_orm::DatabaseConnection;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub storage: Arc<StorageStatus>,
    pub environment: Arc<str>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, storage: StorageStatus, environment: &str) -> Self {
        Self { db, storage: Arc::new(storage), environment: Arc::from(environment) }
    }
}
