//! Server configuration
//!
//! Loaded once at startup from environment variables (a `.env` file is read
//! first when present).
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `HTTP_PORT` | `3000` | HTTP listen port |
//! | `WORK_DIR` | `./data` | working directory (database, logs) |
//! | `DATABASE_PATH` | `{WORK_DIR}/portal.db` | SQLite database file |
//! | `ENVIRONMENT` | `development` | `development` \| `staging` \| `production` |
//! | `LOG_LEVEL` | `info` | tracing level filter |
//! | `GATEWAY_TIMEOUT_MS` | `10000` | outbound gateway request timeout |
//! | `WEBHOOK_TOLERANCE_SECS` | `300` | webhook signature timestamp tolerance |

use std::path::PathBuf;

/// Runtime configuration for the portal payments server
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,
    /// Working directory (database, logs)
    pub work_dir: String,
    /// SQLite database file path
    pub database_path: String,
    /// Deployment environment: development | staging | production
    pub environment: String,
    /// Log level filter
    pub log_level: String,
    /// Timeout for outbound gateway requests (milliseconds)
    pub gateway_timeout_ms: u64,
    /// Accepted clock skew for webhook signatures (seconds)
    pub webhook_tolerance_secs: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{work_dir}/portal.db"));

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            work_dir,
            database_path,
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            gateway_timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            webhook_tolerance_secs: std::env::var("WEBHOOK_TOLERANCE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Construct a config with explicit overrides (tests)
    pub fn with_overrides(work_dir: &str, http_port: u16, database_path: &str) -> Self {
        Self {
            http_port,
            work_dir: work_dir.to_string(),
            database_path: database_path.to_string(),
            environment: "development".to_string(),
            log_level: "debug".to_string(),
            gateway_timeout_ms: 10_000,
            webhook_tolerance_secs: 300,
        }
    }

    /// Log directory under the working directory
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if it does not exist yet
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(self.log_dir())?;
        if let Some(parent) = PathBuf::from(&self.database_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/portal-test", 8080, "/tmp/portal-test/t.db");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.work_dir, "/tmp/portal-test");
        assert_eq!(config.database_path, "/tmp/portal-test/t.db");
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_log_dir_under_work_dir() {
        let config = Config::with_overrides("/tmp/portal-test", 8080, "/tmp/portal-test/t.db");
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/portal-test/logs"));
    }
}
