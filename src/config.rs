//! Configuration management for the order-intake application.
//!
//! Loads configuration from environment variables with sensible defaults. The
//! binary calls `dotenvy::dotenv()` first, so a `.env` file works too.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which collaborator implementation the workflow runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Customer, product and order actors.
    #[default]
    Memory,
    /// `SqliteStore` at `DATABASE_URL`.
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "actors" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Store backend (`ORDER_STORE`)
    pub store: StoreBackend,
    pub database: DatabaseConfig,
    pub actors: ActorConfig,
    pub log: LogConfig,
}

/// `SQLite` configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://orders.db?mode=rwc`
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Seconds a writer waits for a locked database
    pub busy_timeout: u64,
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout)
    }
}

/// Actor runtime configuration
#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// Mailbox capacity of each resource actor
    pub buffer_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-module)
    pub filter: String,
    /// Compact single-line output
    pub compact: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = &lookup;
        Self {
            store: parsed(lookup, "ORDER_STORE").unwrap_or_default(),
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite::memory:".to_string()),
                max_connections: parsed(lookup, "DATABASE_MAX_CONNECTIONS").unwrap_or(1),
                busy_timeout: parsed(lookup, "DATABASE_BUSY_TIMEOUT").unwrap_or(5),
            },
            actors: ActorConfig {
                buffer_size: parsed::<usize>(lookup, "ACTOR_BUFFER_SIZE")
                    .filter(|size| *size > 0)
                    .unwrap_or(32),
            },
            log: LogConfig {
                filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                compact: parsed(lookup, "LOG_COMPACT").unwrap_or(true),
            },
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_run_in_memory() {
        let config = config(&[]);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.actors.buffer_size, 32);
        assert_eq!(config.log.filter, "info");
        assert!(config.log.compact);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("ORDER_STORE", "SQLite"),
            ("DATABASE_URL", "sqlite://orders.db?mode=rwc"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_BUSY_TIMEOUT", "9"),
            ("ACTOR_BUFFER_SIZE", "128"),
            ("LOG_COMPACT", "false"),
        ]);
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.database.url, "sqlite://orders.db?mode=rwc");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(9));
        assert_eq!(config.actors.buffer_size, 128);
        assert!(!config.log.compact);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = config(&[
            ("ORDER_STORE", "postgres"),
            ("ACTOR_BUFFER_SIZE", "0"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.actors.buffer_size, 32);
        assert_eq!(config.database.max_connections, 1);
    }
}
