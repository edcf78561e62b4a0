use std::time::{SystemTime, UNIX_EPOCH};

use crate::log::log_level::LogLevel;

/// One log event: severity, millisecond timestamp, origin and text.
#[derive(Debug, Clone)]
pub struct LogMsg {
    pub level: LogLevel,
    pub ts_ms: u128,
    pub text: String,
    /// Static module path of the call site.
    pub target: &'static str,
}

impl LogMsg {
    /// Builds a message stamped with the current wall-clock time.
    pub fn new(level: LogLevel, text: impl Into<String>, target: &'static str) -> Self {
        Self {
            level,
            ts_ms: now_millis(),
            text: text.into(),
            target,
        }
    }
}

/// Milliseconds since the UNIX epoch; zero if the clock is before it.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
