//! Configuration loading from a TOML file with environment variable overrides.
//!
//! Looks for `smartmon.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values, and `RUST_LOG` wins over `SMARTMON_LOG`.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use smartmon_domain::page::DEFAULT_PAGE_SIZE;

const CONFIG_FILE: &str = "smartmon.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// List endpoint settings.
    pub pagination: PaginationConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a list request omits `pageSize`.
    pub default_page_size: u32,
}

impl Config {
    /// Load configuration from `smartmon.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override cannot be parsed, or if the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SMARTMON_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SMARTMON_PORT") {
            self.server.port = parse_port("SMARTMON_PORT", &port)?;
        }
        if let Some(bind) = lookup("SMARTMON_BIND") {
            let (host, port) = bind
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::InvalidOverride {
                    name: "SMARTMON_BIND",
                    value: bind.clone(),
                })?;
            self.server.port = parse_port("SMARTMON_BIND", port)?;
            self.server.host = host.to_string();
        }
        if let Some(url) = lookup("SMARTMON_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(filter) = lookup("SMARTMON_LOG") {
            self.logging.filter = filter;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.logging.filter = filter;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero"));
        }
        if self.pagination.default_page_size == 0 {
            return Err(ConfigError::Validation("default page size must be non-zero"));
        }
        self.log_filter()?;
        Ok(())
    }

    /// Parse the logging filter directive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogFilter`] when the directive is malformed.
    pub fn log_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.logging.filter).map_err(|source| ConfigError::LogFilter {
            filter: self.logging.filter.clone(),
            source,
        })
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_port(name: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidOverride {
        name,
        value: value.to_string(),
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:smartmon.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smartmond=info,smartmon=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An environment override holds a value that cannot be used.
    #[error("invalid value for {name}: {value:?}")]
    InvalidOverride { name: &'static str, value: String },
    /// The logging filter is not a valid directive.
    #[error("invalid log filter {filter:?}")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(&'static str),
}
