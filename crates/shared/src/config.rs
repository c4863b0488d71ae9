//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite connection URL. The default is a private in-memory database.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// How long a transaction waits for the connection before failing as transient.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// Attempts made to find an unused transaction code.
    #[serde(default = "default_transaction_code_attempts")]
    pub transaction_code_attempts: u32,
}

fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

fn default_transaction_code_attempts() -> u32 {
    16
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            lock_timeout_ms: default_lock_timeout_ms(),
            transaction_code_attempts: default_transaction_code_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of the human readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "ledgerline=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `LEDGERLINE__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLINE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "LEDGERLINE__STORE__DATABASE_URL",
                "LEDGERLINE__STORE__LOCK_TIMEOUT_MS",
                "LEDGERLINE__LOGGING__JSON",
            ],
            || {
                let cfg = AppConfig::load().unwrap();
                assert_eq!(cfg.store.database_url, "sqlite::memory:");
                assert_eq!(cfg.store.lock_timeout_ms, 5000);
                assert_eq!(cfg.store.transaction_code_attempts, 16);
                assert_eq!(cfg.logging.filter, "ledgerline=info");
                assert!(!cfg.logging.json);
            },
        );
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("LEDGERLINE__STORE__DATABASE_URL", Some("sqlite://ledger.db?mode=rwc")),
                ("LEDGERLINE__STORE__LOCK_TIMEOUT_MS", Some("250")),
                ("LEDGERLINE__LOGGING__JSON", Some("true")),
            ],
            || {
                let cfg = AppConfig::load().unwrap();
                assert_eq!(cfg.store.database_url, "sqlite://ledger.db?mode=rwc");
                assert_eq!(cfg.store.lock_timeout_ms, 250);
                assert_eq!(cfg.store.transaction_code_attempts, 16);
                assert!(cfg.logging.json);
            },
        );
    }
}
