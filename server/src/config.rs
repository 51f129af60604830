//! Server configuration.
//!
//! Built once at startup and handed to [`crate::AppState`]; nothing reads the
//! environment after that.

use std::fmt;
use std::time::Duration;

use ratefeed_store::{PoolSettings, TableName};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// A configuration value that must not appear in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether no value was configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(***)")
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" | "pretty" | "plain" => Some(LogFormat::Text),
            _ => None,
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields.
    pub url: Option<Secret>,
    /// Database server host.
    pub host: String,
    /// Database server port.
    pub port: u16,
    /// Database name.
    pub name: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: Secret,
    /// Require an encrypted connection when built from discrete fields.
    pub require_tls: bool,
    /// Table holding the rate records.
    pub table: String,
    /// Pool limits.
    pub pool: PoolSettings,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            name: "monedavalor".to_string(),
            user: "monedavalor".to_string(),
            password: Secret::default(),
            require_tls: true,
            table: "moneda_valor".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl DatabaseConfig {
    /// Build driver connect options.
    ///
    /// A URL keeps whatever `sslmode` it specifies; discrete fields use
    /// `require_tls` to pick between `require` and `prefer`.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.expose().parse();
        }

        let ssl_mode = if self.require_tls {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .ssl_mode(ssl_mode);
        if !self.password.is_empty() {
            options = options.password(self.password.expose());
        }
        Ok(options)
    }
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Node ID reported in logs and on `/`. Generated when absent.
    pub node_id: Option<String>,
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Expected `X-API-Key` value. Empty disables the check.
    pub api_key: Secret,
    /// Service title shown on `/`.
    pub app_title: String,
    /// Service version shown on `/`.
    pub app_version: String,
    /// Expose `/metrics`.
    pub metrics_enabled: bool,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            node_id: None,
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8000,
            database: DatabaseConfig::default(),
            api_key: Secret::default(),
            app_title: "MonedaValor API".to_string(),
            app_version: "1.0.0".to_string(),
            metrics_enabled: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset; unparsable numbers keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(id) = get("RATEFEED_NODE_ID") {
            config.node_id = Some(id);
        }
        if let Some(addr) = get("RATEFEED_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(port) = get("RATEFEED_LISTEN_PORT").and_then(|p| p.parse().ok()) {
            config.listen_port = port;
        }

        let db = &mut config.database;
        if let Some(url) = get("DATABASE_URL") {
            db.url = Some(Secret::new(url));
        }
        if let Some(host) = get("DB_SERVER") {
            db.host = host;
        }
        if let Some(port) = get("DB_PORT").and_then(|p| p.parse().ok()) {
            db.port = port;
        }
        if let Some(name) = get("DB_NAME") {
            db.name = name;
        }
        if let Some(user) = get("DB_USER") {
            db.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD").filter(|p| !p.is_empty()) {
            db.password = Secret::new(password);
        }
        if let Some(flag) = get("DB_REQUIRE_TLS").and_then(|v| parse_bool(&v)) {
            db.require_tls = flag;
        }
        if let Some(table) = get("RATEFEED_TABLE") {
            db.table = table;
        }
        if let Some(max) = get("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            db.pool.max_connections = max;
        }
        if let Some(secs) = get("DB_ACQUIRE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            db.pool.acquire_timeout = Duration::from_secs(secs);
        }

        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            config.api_key = Secret::new(key);
        }
        if let Some(title) = get("APP_TITLE") {
            config.app_title = title;
        }
        if let Some(version) = get("APP_VERSION") {
            config.app_version = version;
        }
        if let Some(flag) = get("METRICS_ENABLED").and_then(|v| parse_bool(&v)) {
            config.metrics_enabled = flag;
        }
        if let Some(level) = get("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(format) = get("LOG_FORMAT").and_then(|v| LogFormat::parse(&v)) {
            config.log_format = format;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.database.url.is_none()
            && (self.database.host.is_empty() || self.database.name.is_empty())
        {
            return Err("Either DATABASE_URL or DB_SERVER and DB_NAME must be set".to_string());
        }

        if let Err(e) = TableName::parse(&self.database.table) {
            return Err(e.to_string());
        }

        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err("Pool max connections cannot be 0".to_string());
        }
        if pool.min_connections > pool.max_connections {
            return Err("Pool min connections cannot exceed max connections".to_string());
        }
        if pool.acquire_timeout.is_zero() {
            return Err("Pool acquire timeout cannot be zero".to_string());
        }

        Ok(())
    }

    /// `addr:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Whether requests to `/api` must carry an API key.
    pub fn auth_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
