//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `ecohub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

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
    /// Control loop tunables.
    pub control: ControlConfig,
    /// External predictor.
    pub predictor: PredictorConfig,
    /// Virtual actuator.
    pub actuator: ActuatorConfig,
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
    /// `SQLite` connection URL or file path.
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
pub struct ControlConfig {
    /// Seconds between two ticks.
    pub interval_secs: u64,
    /// Initial alert threshold in kWh.
    pub threshold: f64,
    /// Amplitude of the noise added to each sample.
    pub jitter: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Program to run; the local fallback formula is used when unset.
    pub program: Option<String>,
    /// Arguments placed before the hour, day and weekend arguments.
    pub args: Vec<String>,
    /// Seconds before a running predictor is killed.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Whether the virtual actuator starts out reachable.
    pub reachable: bool,
}

impl Config {
    /// Load configuration from `ecohub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("ecohub.toml")?;
        config.apply_env_overrides();
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

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ECOHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ECOHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ECOHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ECOHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("ECOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("ECOHUB_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.control.threshold = threshold;
            }
        }
        if let Ok(val) = std::env::var("ECOHUB_PREDICTOR_PROGRAM") {
            self.predictor.program = Some(val).filter(|program| !program.is_empty());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if !(self.control.threshold.is_finite() && self.control.threshold > 0.0) {
            return Err(ConfigError::Validation(
                "threshold must be positive".to_string(),
            ));
        }
        if self.control.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "control interval must be non-zero".to_string(),
            ));
        }
        if !(self.control.jitter.is_finite() && self.control.jitter >= 0.0) {
            return Err(ConfigError::Validation(
                "jitter must not be negative".to_string(),
            ));
        }
        if self.predictor.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "predictor timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn control_interval(&self) -> Duration {
        Duration::from_secs(self.control.interval_secs)
    }

    #[must_use]
    pub fn predictor_timeout(&self) -> Duration {
        Duration::from_secs(self.predictor.timeout_secs)
    }
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
            url: "sqlite:ecohub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ecohubd=info,ecohub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            threshold: 70.0,
            jitter: 2.0,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            timeout_secs: 5,
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self { reachable: true }
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
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
