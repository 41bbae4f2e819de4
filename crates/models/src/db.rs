//! Connection helpers: URL normalization and redaction, pool options and the
//! liveness query.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use url::Url;

use configs::DatabaseConfig;

pub const LIVENESS_QUERY: &str = "SELECT 1 AS ok";
const PASSWORD_MASK: &str = "****";
const LEGACY_SCHEME: &str = "postgres://";
const SCHEME: &str = "postgresql://";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_ascii_lowercase();
        if lower.starts_with("postgresql://") || lower.starts_with(LEGACY_SCHEME) {
            Some(Self::Postgres)
        } else if lower.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self { Self::Postgres => "postgres", Self::Sqlite => "sqlite" }
    }
}

/// Rewrite the legacy `postgres://` prefix to `postgresql://`.
pub fn normalize_url(url: &str) -> String {
    match url.strip_prefix(LEGACY_SCHEME) {
        Some(rest) => format!("{SCHEME}{rest}"),
        None => url.to_string(),
    }
}

/// Mask the password part of a connection URL for logging.
pub fn redact_url(url: &str) -> String {
    if let Ok(mut parsed) = Url::parse(url) {
        if parsed.password().is_some() && parsed.set_password(Some(PASSWORD_MASK)).is_ok() {
            return parsed.to_string();
        }
        if parsed.password().is_none() {
            return url.to_string();
        }
    }
    // unparsable: hide everything between the scheme and '@'
    match (url.find("://"), url.rfind('@')) {
        (Some(s), Some(at)) if at > s + 3 => format!("{}{}{}", &url[..s + 3], PASSWORD_MASK, &url[at..]),
        _ => url.to_string(),
    }
}

/// TLS negotiation for PostgreSQL: mandatory for hosted Render databases,
/// opportunistic elsewhere.
pub fn ssl_mode_for(url: &str) -> &'static str {
    if url.contains("render.com") { "require" } else { "prefer" }
}

/// Add backend-specific connection arguments unless already present:
/// `sslmode` for PostgreSQL, `mode=rwc` for SQLite files.
pub fn with_connect_args(url: &str) -> String {
    let (key, value) = match Backend::from_url(url) {
        Some(Backend::Postgres) => ("sslmode", ssl_mode_for(url)),
        Some(Backend::Sqlite) if !url.contains(":memory:") => ("mode", "rwc"),
        _ => return url.to_string(),
    };
    if url.contains(&format!("{key}=")) {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{key}={value}")
}

/// Pool options: pre-use ping, periodic recycle, bounded size plus overflow.
pub fn connect_options(url: &str, cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(with_connect_args(&normalize_url(url)));
    opt.max_connections(cfg.max_connections())
        .min_connections(cfg.pool_size.min(cfg.max_connections()).max(1))
        .connect_timeout(cfg.connect_timeout())
        .acquire_timeout(cfg.acquire_timeout())
        .idle_timeout(cfg.idle_timeout())
        .max_lifetime(cfg.pool_recycle())
        .test_before_acquire(cfg.pre_ping)
        .sqlx_logging(cfg.sqlx_logging);
    opt
}

/// Run the liveness query and return its value.
pub async fn ping<C: ConnectionTrait>(db: &C) -> Result<i32, DbErr> {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(backend, LIVENESS_QUERY))
        .await?
        .ok_or_else(|| DbErr::Custom("liveness query returned no row".into()))?;
    row.try_get::<i32>("", "ok")
}

/// Open a pool for `url` and verify it with the liveness query. A URL with an
/// unsupported scheme fails like an unreachable server, without leaking its
/// credentials into the error.
pub async fn connect_once(url: &str, cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    if Backend::from_url(url).is_none() {
        return Err(DbErr::Custom(format!("unsupported database url: {}", redact_url(url))));
    }
    let db = Database::connect(connect_options(url, cfg)).await?;
    let value = ping(&db).await?;
    tracing::info!(result = value, "connection test succeeded");
    Ok(db)
}

/// Single-attempt connection using the configured primary URL.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    Ok(connect_once(cfg.primary_url(), cfg).await?)
}
