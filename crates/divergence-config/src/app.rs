//! Application-wide configuration settings

use serde::{Deserialize, Serialize};

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name for logging and identification
    pub name: String,

    /// Application version
    pub version: String,

    /// Global log level
    pub log_level: LogLevel,

    /// Enable debug mode with additional logging
    pub debug_mode: bool,
}

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "divergence".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: LogLevel::Info,
            debug_mode: false,
        }
    }
}

impl AppConfig {
    /// Check if running in debug mode
    pub fn is_debug(&self) -> bool {
        self.debug_mode || matches!(self.log_level, LogLevel::Debug | LogLevel::Trace)
    }

    /// Effective filter directive; debug mode raises the level to at least `debug`
    pub fn log_filter(&self) -> &'static str {
        match self.log_level {
            LogLevel::Trace => "trace",
            _ if self.debug_mode => "debug",
            level => level.as_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_mode_detection() {
        let mut config = AppConfig::default();
        assert!(!config.is_debug());

        config.debug_mode = true;
        assert!(config.is_debug());

        config.debug_mode = false;
        config.log_level = LogLevel::Debug;
        assert!(config.is_debug());
    }

    #[test]
    fn test_log_filter() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_filter(), "info");

        config.debug_mode = true;
        assert_eq!(config.log_filter(), "debug");

        config.log_level = LogLevel::Trace;
        assert_eq!(config.log_filter(), "trace");
    }
}
