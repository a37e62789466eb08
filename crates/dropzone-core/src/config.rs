//! Configuration module
//!
//! Configuration is read from the environment (a `.env` file is loaded first when
//! present) and validated before the server starts.

use crate::policy::ValidationPolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_UPLOAD_SIZE_MB: u64 = 10;
const REQUEST_BODY_LIMIT_MB: u64 = 32;
const UPLOAD_DIR: &str = "uploads";
const ALLOWED_UPLOAD_TYPES: &str = "csv=text/csv";
const ANALYSIS_PATH: &str = "analysis.php";

const MIB: u64 = 1024 * 1024;

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub upload_dir: PathBuf,
    pub upload_temp_dir: Option<PathBuf>,
    pub analysis_path: String,
    pub request_body_limit_bytes: u64,
    pub log_format: LogFormat,
    pub policy: ValidationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            upload_dir: PathBuf::from(UPLOAD_DIR),
            upload_temp_dir: None,
            analysis_path: ANALYSIS_PATH.to_string(),
            request_body_limit_bytes: REQUEST_BODY_LIMIT_MB * MIB,
            log_format: LogFormat::Compact,
            policy: ValidationPolicy::default(),
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, anyhow::Error> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid value, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn mib_to_bytes(key: &str, mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(MIB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large, got {}", key, mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let max_upload_size_mb: u64 = parse_var(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let request_body_limit_mb: u64 =
            parse_var(&lookup, "REQUEST_BODY_LIMIT_MB", REQUEST_BODY_LIMIT_MB)?;
        let content_sniffing: bool = parse_var(&lookup, "CONTENT_SNIFFING", false)?;

        let allowed_types = ValidationPolicy::parse_allowed_types(
            &lookup("ALLOWED_UPLOAD_TYPES").unwrap_or_else(|| ALLOWED_UPLOAD_TYPES.to_string()),
        )?;

        let max_size_bytes = mib_to_bytes("MAX_UPLOAD_SIZE_MB", max_upload_size_mb)?;
        let request_body_limit_bytes =
            mib_to_bytes("REQUEST_BODY_LIMIT_MB", request_body_limit_mb)?;

        let policy = ValidationPolicy::new(allowed_types, max_size_bytes)
            .with_content_sniffing(content_sniffing);

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::Compact,
        };

        Ok(Config {
            server_port: parse_var(&lookup, "PORT", SERVER_PORT)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(UPLOAD_DIR)),
            upload_temp_dir: lookup("UPLOAD_TEMP_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            analysis_path: lookup("ANALYSIS_PATH").unwrap_or_else(|| ANALYSIS_PATH.to_string()),
            request_body_limit_bytes,
            log_format,
            policy,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.policy.allowed_types().is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_UPLOAD_TYPES must contain at least one ext=mime pair"
            ));
        }

        if self.policy.max_size_bytes() == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.request_body_limit_bytes < self.policy.max_size_bytes() {
            return Err(anyhow::anyhow!(
                "REQUEST_BODY_LIMIT_MB must be at least MAX_UPLOAD_SIZE_MB"
            ));
        }

        if self.analysis_path.trim().is_empty() {
            return Err(anyhow::anyhow!("ANALYSIS_PATH must not be empty"));
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        Ok(())
    }
}
