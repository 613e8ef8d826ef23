use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// SQLite database file, created on first start
    #[validate(custom(function = "validate_database_path"))]
    pub database_path: PathBuf,

    /// How long a statement waits on a locked database before failing
    #[validate(range(
        max = 60000,
        message = "Busy timeout must be at most 60000ms"
    ))]
    pub busy_timeout_ms: u64,

    /// Largest accepted request body
    #[validate(range(
        min = 1,
        max = 67108864,
        message = "Max body size must be between 1 byte and 64MiB"
    ))]
    pub max_body_bytes: usize,

    /// Return raw store error text to callers
    pub verbose_errors: bool,

    /// Whether to run server in daemon mode
    pub daemon: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: PathBuf::from("./db.sqlite3"),
            busy_timeout_ms: 100,
            max_body_bytes: 1024 * 1024,
            verbose_errors: true,
            daemon: false,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("SQLGATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("SQLGATE_PORT", "8080")?,
            database_path: PathBuf::from(
                env::var("SQLGATE_DATABASE").unwrap_or_else(|_| "./db.sqlite3".to_string()),
            ),
            busy_timeout_ms: parse_env_var("SQLGATE_BUSY_TIMEOUT_MS", "100")?,
            max_body_bytes: parse_env_var("SQLGATE_MAX_BODY_BYTES", "1048576")?,
            verbose_errors: parse_env_var("SQLGATE_VERBOSE_ERRORS", "true")?,
            daemon: false, // Environment-based config always runs in foreground
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            database_path: cli.database_path,
            busy_timeout_ms: cli.busy_timeout_ms,
            max_body_bytes: cli.max_body_bytes,
            verbose_errors: !cli.quiet_errors,
            daemon: cli.daemon,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (CLI overrides environment)
    pub fn merge(&mut self, other: Self) {
        self.http_host = other.http_host;
        self.http_port = other.http_port;
        self.database_path = other.database_path;
        self.busy_timeout_ms = other.busy_timeout_ms;
        self.max_body_bytes = other.max_body_bytes;
        self.verbose_errors = other.verbose_errors;
        self.daemon = other.daemon;
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub database_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub max_body_bytes: usize,
    pub quiet_errors: bool,
    pub daemon: bool,
}

fn validate_database_path(path: &PathBuf) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        return Err(ValidationError::new("empty_database_path")
            .with_message("Database path cannot be empty".into()));
    }
    Ok(())
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
