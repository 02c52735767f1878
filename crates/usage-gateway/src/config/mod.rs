//! Environment-backed configuration snapshot.
//!
//! Resolved once before anything else starts; nothing re-reads it mid-run.
//! Empty variables count as unset.

pub mod schema;

use usage_core::error::Result;

pub use schema::{LogLevel, UsageConfig};

pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_PPROF: &str = "PPROF";

pub fn from_env() -> Result<UsageConfig> {
    from_lookup(|k| std::env::var(k).ok())
}

/// Resolve from an arbitrary key lookup (tests pass a map instead of mutating env).
pub fn from_lookup<F>(lookup: F) -> Result<UsageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).filter(|v| !v.is_empty());
    let mut cfg = UsageConfig::default();

    if let Some(v) = get(ENV_PORT) {
        cfg.port = schema::parse_port(&v)?;
    }

    if let Some(v) = get(ENV_LOG_LEVEL) {
        match LogLevel::parse(&v) {
            Some(level) => cfg.log_level = level,
            None => cfg.ignored.push((ENV_LOG_LEVEL, v)),
        }
    }

    if let Some(v) = get(ENV_PPROF) {
        match schema::parse_flag(&v) {
            Some(on) => cfg.pprof = on,
            None => cfg.ignored.push((ENV_PPROF, v)),
        }
    }

    Ok(cfg)
}
