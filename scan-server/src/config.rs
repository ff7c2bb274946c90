//! Configuration module

use std::env;
use std::path::PathBuf;

/// Server configuration. Detection policy (weights, thresholds, cut points)
/// is loaded separately by the core.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding static_model.json and behavioral_model.json
    pub models_dir: PathBuf,

    /// SQLite detection log
    pub history_db: PathBuf,

    /// Default number of rows for GET /api/v1/logs
    pub history_limit: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),

            history_db: env::var("HISTORY_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_history_path()),

            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(20),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// `<local data dir>/hybrid-scan/history.db`, or `./data/history.db`
fn default_history_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("hybrid-scan"))
        .unwrap_or_else(|| PathBuf::from("data"))
        .join("history.db")
}
