//! Application configuration.
//!
//! Values are resolved with priority config.toml > environment (.env is
//! loaded first) > built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::db::LogOnError;

// ==================== Defaults ====================

pub const DEFAULT_DB_PATH: &str = "data/cardwise.db";

/// Server address to bind to
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Maximum cards returned by a due query
pub const DEFAULT_DUE_LIMIT: usize = 50;

pub const DEFAULT_LOG_FILTER: &str = "cardwise=debug,tower_http=debug";

// ==================== File Format ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    study: Option<StudySection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct StudySection {
    due_limit: Option<usize>,
}

// ==================== Resolved Config ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
    pub due_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            due_limit: DEFAULT_DUE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load from ./config.toml and the process environment
    pub fn load() -> Self {
        // A missing .env is normal, anything else is worth a warning
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Could not load .env: {}", e);
            }
        }
        Self::load_from(Path::new("config.toml"), |key| std::env::var(key).ok())
    }

    /// Resolve against a specific config file and environment lookup
    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<FileConfig>(&contents)
                .log_warn_default(&format!("Ignoring invalid {}", path.display())),
            Err(_) => FileConfig::default(),
        };

        let database = file.database.unwrap_or_default();
        let server = file.server.unwrap_or_default();
        let study = file.study.unwrap_or_default();
        let defaults = Self::default();

        let database_path = database
            .path
            .or_else(|| env("DATABASE_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or(defaults.server_addr);

        let server_port = server
            .port
            .or_else(|| env("SERVER_PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.server_port);

        let due_limit = study
            .due_limit
            .or_else(|| env("DUE_LIMIT").and_then(|v| v.parse().ok()))
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.due_limit);

        tracing::info!("Using database at {}", database_path.display());

        Self {
            database_path,
            server_addr,
            server_port,
            due_limit,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}
