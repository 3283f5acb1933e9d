//! Application settings loaded from environment variables.

use std::env;

use chrono::FixedOffset;

use super::constants::{
    DEFAULT_APP_NAME, DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_TIMEZONE,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_name: String,
    pub database_url: String,
    pub use_cache: bool,
    pub redis_url: String,
    /// Fixed offset every created/updated timestamp is stamped in
    pub timezone: FixedOffset,
    pub server_host: String,
    pub server_port: u16,
    /// Empty means any origin is allowed
    pub allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_name", &self.app_name)
            .field("database_url", &"[REDACTED]")
            .field("use_cache", &self.use_cache)
            .field("redis_url", &"[REDACTED]")
            .field("timezone", &self.timezone)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            use_cache: false,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            timezone: utc(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            allowed_origins: Vec::new(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let timezone_raw = env::var("APP_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let timezone = parse_utc_offset(&timezone_raw).unwrap_or_else(|| {
            tracing::warn!(value = %timezone_raw, "APP_TIMEZONE is not a UTC offset, falling back to UTC");
            utc()
        });

        Self {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            use_cache: env::var("USE_CACHE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            timezone,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::from_env_value(&v))
                .unwrap_or(LogFormat::Pretty),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse a fixed UTC offset such as `+07:00`, `-0530`, `+7` or `Z`.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };

    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap_or_else(|| unreachable!("zero offset is always valid"))
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
