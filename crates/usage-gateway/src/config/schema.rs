use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use usage_core::error::{Result, UsageError};

/// Immutable configuration snapshot, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageConfig {
    pub port: u16,
    pub log_level: LogLevel,
    pub pprof: bool,

    /// Budget for a client to send complete request headers.
    pub header_read_timeout: Duration,
    /// Per-request budget for body read and handling.
    pub request_timeout: Duration,
    /// Bounded wait for in-flight requests after an interrupt.
    pub drain_grace: Duration,

    /// Raw values that could not be interpreted and fell back to defaults.
    /// Reported once the logger is up.
    pub ignored: Vec<(&'static str, String)>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: LogLevel::default(),
            pprof: false,
            header_read_timeout: default_header_read_timeout(),
            request_timeout: default_request_timeout(),
            drain_grace: default_drain_grace(),
            ignored: Vec::new(),
        }
    }
}

impl UsageConfig {
    /// All interfaces, configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive; `warning` is accepted as `warn`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

pub(crate) fn parse_port(s: &str) -> Result<u16> {
    s.trim().parse::<u16>().map_err(|e| {
        UsageError::Config(format!("PORT must be an integer in 0..=65535 (got {s:?}): {e}"))
    })
}

/// Boolean-like flag. `None` means the value was not recognised.
pub(crate) fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_port() -> u16 {
    8080
}
fn default_header_read_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_drain_grace() -> Duration {
    Duration::from_secs(5)
}
