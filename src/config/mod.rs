/// Configuration management for the taskboard server
///
/// Handles server binding, the database location and the CSV export directory.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Admin bulk transfer configuration
    pub export: ExportConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx SQLite url, e.g. "sqlite://data/tasks.db" or "sqlite::memory:"
    pub url: String,
}

/// CSV export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `<table>_<timestamp>.csv` files; created on demand
    pub dir: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("TASKS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("TASKS_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
            },
            database: DatabaseConfig {
                url: std::env::var("TASKS_DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/tasks.db".to_string()),
            },
            export: ExportConfig {
                dir: std::env::var("TASKS_EXPORT_DIR").unwrap_or_else(|_| "exports".to_string()),
            },
        }
    }
}
