//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 secret shared with the identity provider for bearer tokens.
    pub secret: String,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// SQLite pool tuning, read from the `database` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Upper bound on pooled connections. Zero is treated as one.
    pub max_connections: u32,
    /// How long a writer waits on SQLite's lock before giving up.
    pub busy_timeout_secs: u64,
    /// Write-ahead logging with `synchronous = NORMAL`.
    pub wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            busy_timeout_secs: 30,
            wal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn database_section_is_optional() {
        let config: ServerConfig = serde_json::from_value(json!({
            "address": "127.0.0.1",
            "port": 8080,
            "database_url": "app.db",
            "secret": "s3cret",
        }))
        .expect("valid config");

        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn database_section_overrides_defaults_per_key() {
        let config: ServerConfig = serde_json::from_value(json!({
            "address": "127.0.0.1",
            "port": 8080,
            "database_url": "app.db",
            "secret": "s3cret",
            "database": {"busy_timeout_secs": 5, "wal": false},
        }))
        .expect("valid config");

        assert_eq!(
            config.database,
            DatabaseConfig {
                max_connections: 10,
                busy_timeout_secs: 5,
                wal: false,
            }
        );
    }
}
