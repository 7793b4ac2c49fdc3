// src/config.rs
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::FixedOffset;
use thiserror::Error;

use crate::domain::DayZone;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub static_dir: PathBuf,
    pub max_workers: usize,
    pub log_level: String,
    /// Zone that decides what "today" is and which day a stored timestamp falls on.
    pub zone: DayZone,
}

/// Load configuration from the environment, reading `.env` first if present.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation, decoupled from the real environment so tests can
/// pass a map lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = or_default("FLASKER_BIND_ADDR", "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FLASKER_BIND_ADDR", e.to_string()))?;

    let max_workers = or_default("FLASKER_MAX_WORKERS", "8")
        .parse::<usize>()
        .map_err(|e| invalid("FLASKER_MAX_WORKERS", e.to_string()))?;
    if max_workers == 0 {
        return Err(invalid("FLASKER_MAX_WORKERS", "must be at least 1".into()));
    }

    let zone = match lookup("FLASKER_UTC_OFFSET") {
        Ok(raw) if !raw.trim().is_empty() => DayZone::Fixed(
            parse_utc_offset(raw.trim()).map_err(|reason| invalid("FLASKER_UTC_OFFSET", reason))?,
        ),
        _ => DayZone::Local,
    };

    Ok(AppConfig {
        bind_addr,
        db_path: or_default("FLASKER_DB_PATH", "flasker.sqlite3"),
        static_dir: PathBuf::from(or_default("FLASKER_STATIC_DIR", "static")),
        max_workers,
        log_level: or_default("FLASKER_LOG_LEVEL", "info"),
        zone,
    })
}

/// Parse `+HH:MM`, `-HH:MM` or `Z`.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset, String> {
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "offset out of range".to_string());
    }

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(format!("expected +HH:MM or -HH:MM, got {raw:?}")),
    };

    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| format!("expected +HH:MM or -HH:MM, got {raw:?}"))?;
    let hours = two_digits(hours)
        .filter(|h| *h <= 23)
        .ok_or_else(|| format!("bad hours in {raw:?}"))?;
    let minutes = two_digits(minutes)
        .filter(|m| *m <= 59)
        .ok_or_else(|| format!("bad minutes in {raw:?}"))?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset out of range: {raw:?}"))
}

/// One or two ASCII digits, nothing else (no sign).
fn two_digits(text: &str) -> Option<i32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
