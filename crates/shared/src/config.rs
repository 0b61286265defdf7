//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Size of the reader connection pool.
    ///
    /// Defaults to the machine's available parallelism when zero.
    #[serde(default)]
    pub reader_connections: u32,
    /// Busy-wait timeout in seconds under write contention.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl DatabaseConfig {
    /// Creates a configuration for the given database file path with defaults.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reader_connections: 0,
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }

    /// Resolves the reader pool size, falling back to available parallelism.
    #[must_use]
    pub fn reader_pool_size(&self) -> u32 {
        if self.reader_connections > 0 {
            return self.reader_connections;
        }
        std::thread::available_parallelism().map_or(4, |n| n.get() as u32)
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Environment variables use the `LARILEDGER` prefix with `__` as the
    /// level separator, e.g. `LARILEDGER__DATABASE__PATH=ledger.db`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LARILEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
