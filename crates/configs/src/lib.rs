use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Embedded database used when no `DATABASE_URL` is configured.
pub const DEFAULT_LOCAL_URL: &str = "sqlite://./student_course_api.db";
/// Embedded database used when the primary database cannot be reached.
pub const DEFAULT_FALLBACK_URL: &str = "sqlite://./fallback.db";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Tag reported by `GET /`; derived from `RENDER` when unset.
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Allow any origin, method and header (credentials included).
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            worker_threads: Some(4),
            environment: None,
            log_format: LogFormat::Compact,
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Primary database; empty means "use `local_url`".
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_local_url")]
    pub local_url: String,
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_max_overflow")]
    pub max_overflow: u32,
    #[serde(default = "default_pool_recycle")]
    pub pool_recycle_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub pre_ping: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_interval")]
    pub retry_interval_ms: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_true() -> bool { true }
fn default_local_url() -> String { DEFAULT_LOCAL_URL.to_string() }
fn default_fallback_url() -> String { DEFAULT_FALLBACK_URL.to_string() }
fn default_pool_size() -> u32 { 5 }
fn default_max_overflow() -> u32 { 10 }
fn default_pool_recycle() -> u64 { 300 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_retries() -> u32 { 5 }
fn default_retry_interval() -> u64 { 2000 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            local_url: default_local_url(),
            fallback_url: default_fallback_url(),
            pool_size: default_pool_size(),
            max_overflow: default_max_overflow(),
            pool_recycle_secs: default_pool_recycle(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            pre_ping: true,
            max_retries: default_max_retries(),
            retry_interval_ms: default_retry_interval(),
            sqlx_logging: false,
        }
    }
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) when present, otherwise start from
    /// defaults; then overlay the environment and validate.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        let port = std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT"));
        if let Some(p) = port.ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = p;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
        if let Ok(fmt) = std::env::var("LOG_FORMAT") {
            match fmt.to_ascii_lowercase().as_str() {
                "json" => self.log_format = LogFormat::Json,
                "compact" => self.log_format = LogFormat::Compact,
                _ => {}
            }
        }
        if self.environment.is_none() && std::env::var_os("RENDER").is_some() {
            self.environment = Some("production".into());
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    /// `GET /` environment tag.
    pub fn environment_tag(&self) -> &str {
        self.environment.as_deref().unwrap_or("development")
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        self.url = self.url.trim().to_string();
    }

    /// The primary `url` is not checked here: an unusable primary is a
    /// connection failure at startup and ends on the fallback database.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("database.local_url", &self.local_url), ("database.fallback_url", &self.fallback_url)] {
            let lower = url.to_lowercase();
            if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
                return Err(anyhow!("{name} must start with postgresql://, postgres:// or sqlite:"));
            }
        }
        if self.pool_size == 0 {
            return Err(anyhow!("database.pool_size must be >= 1"));
        }
        if self.max_retries == 0 {
            return Err(anyhow!("database.max_retries must be >= 1"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// URL to try first: the configured one, or the local embedded file.
    pub fn primary_url(&self) -> &str {
        if self.url.is_empty() { &self.local_url } else { &self.url }
    }

    pub fn max_connections(&self) -> u32 { self.pool_size + self.max_overflow }
    pub fn retry_interval(&self) -> Duration { Duration::from_millis(self.retry_interval_ms) }
    pub fn pool_recycle(&self) -> Duration { Duration::from_secs(self.pool_recycle_secs) }
    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
    pub fn acquire_timeout(&self) -> Duration { Duration::from_secs(self.acquire_timeout_secs) }
    pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout_secs) }

    /// Single-connection in-memory SQLite, used by tests.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            pool_size: 1,
            max_overflow: 0,
            max_retries: 1,
            retry_interval_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pool_and_retry_policy() {
        let db = DatabaseConfig::default();
        assert_eq!(db.pool_size, 5);
        assert_eq!(db.max_overflow, 10);
        assert_eq!(db.max_connections(), 15);
        assert_eq!(db.pool_recycle(), Duration::from_secs(300));
        assert_eq!(db.max_retries, 5);
        assert_eq!(db.retry_interval(), Duration::from_secs(2));
        assert!(db.pre_ping);
        assert_eq!(db.primary_url(), DEFAULT_LOCAL_URL);
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            log_format = "json"

            [database]
            url = "postgresql://u:p@db:5432/app"
            max_retries = 3
            "#,
        ).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.log_format, LogFormat::Json);
        assert!(cfg.server.cors_permissive);
        assert_eq!(cfg.database.max_retries, 3);
        assert_eq!(cfg.database.pool_size, 5);
        assert_eq!(cfg.database.fallback_url, DEFAULT_FALLBACK_URL);
        assert_eq!(cfg.database.primary_url(), "postgresql://u:p@db:5432/app");
    }

    #[test]
    fn validate_rejects_unknown_scheme_for_local_databases() {
        let db = DatabaseConfig { local_url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        let db = DatabaseConfig { fallback_url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn unusable_primary_url_passes_validation() {
        let db = DatabaseConfig { url: "mysql://u:p@h/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_ok());
        assert_eq!(db.primary_url(), "mysql://u:p@h/db");
    }

    #[test]
    fn validate_rejects_zero_pool_and_zero_retries() {
        let db = DatabaseConfig { pool_size: 0, ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        let db = DatabaseConfig { max_retries: 0, ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn validate_accepts_empty_url_and_sqlite() {
        assert!(DatabaseConfig::default().validate().is_ok());
        assert!(DatabaseConfig::in_memory().validate().is_ok());
    }

    #[test]
    fn environment_tag_defaults_to_development() {
        let s = ServerConfig::default();
        assert_eq!(s.environment_tag(), "development");
        let s = ServerConfig { environment: Some("production".into()), ..ServerConfig::default() };
        assert_eq!(s.environment_tag(), "production");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut s = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(s.normalize().is_err());
    }
}
