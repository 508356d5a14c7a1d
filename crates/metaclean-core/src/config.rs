//! Configuration module
//!
//! The service is configured from environment variables (optionally loaded from a
//! `.env` file). Configuration is built once at startup and passed explicitly to
//! the router and services.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine_kind::EngineKind;

const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const ENGINE_TIMEOUT_SECS: u64 = 120;
const MAX_CONCURRENT_SESSIONS: usize = 8;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub temp_dir: PathBuf,
    pub engine: EngineKind,
    pub exiftool_path: String,
    pub engine_timeout_secs: u64,
    pub max_concurrent_sessions: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            temp_dir: env::temp_dir(),
            engine: EngineKind::ExifTool,
            exiftool_path: "exiftool".to_string(),
            engine_timeout_secs: ENGINE_TIMEOUT_SECS,
            max_concurrent_sessions: MAX_CONCURRENT_SESSIONS,
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (environment in production, maps in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);
        let is_production = is_production_name(&environment);

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = parse_var(&lookup, "PORT", defaults.server_port)?;

        let max_upload_size_mb = parse_var(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let engine = match lookup("METADATA_ENGINE") {
            Some(name) => name.parse()?,
            None => defaults.engine,
        };

        let log_format = match lookup("LOG_FORMAT").map(|s| s.trim().to_lowercase()) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            max_upload_size_bytes,
            temp_dir: lookup("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            engine,
            exiftool_path: lookup("EXIFTOOL_PATH").unwrap_or(defaults.exiftool_path),
            engine_timeout_secs: parse_var(&lookup, "ENGINE_TIMEOUT_SECS", ENGINE_TIMEOUT_SECS)?,
            max_concurrent_sessions: parse_var(
                &lookup,
                "MAX_CONCURRENT_SESSIONS",
                MAX_CONCURRENT_SESSIONS,
            )?,
            log_format,
        })
    }

    /// Fail fast on values that would make the service unusable.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.engine_timeout_secs == 0 {
            return Err(anyhow::anyhow!("ENGINE_TIMEOUT_SECS must be greater than 0"));
        }
        if self.max_concurrent_sessions == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_SESSIONS must be greater than 0"
            ));
        }
        if !self.temp_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "TEMP_DIR {} is not an existing directory",
                self.temp_dir.display()
            ));
        }
        if self.engine == EngineKind::ExifTool && self.exiftool_path.trim().is_empty() {
            return Err(anyhow::anyhow!("EXIFTOOL_PATH must not be empty"));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn exiftool_path(&self) -> &str {
        &self.exiftool_path
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }

    pub fn max_concurrent_sessions(&self) -> usize {
        self.max_concurrent_sessions
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

/// Parse an optional numeric variable; a present but malformed value is an error.
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, value)),
        None => Ok(default),
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
