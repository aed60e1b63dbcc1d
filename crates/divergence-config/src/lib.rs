//! Configuration management for divergence detection
//!
//! Centralized configuration handling with support for:
//! - Default values
//! - Configuration files (TOML)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`DIVERGENCE_DATA__WINDOW_SIZE=120`)
//! 3. Configuration file (`divergence.toml`)
//! 4. Default values

mod app;
mod data;

// Re-export main types
pub use app::{AppConfig, LogLevel};
pub use data::DataConfig;
pub use divergence_io::CandleFormat;
pub use divergence_core::DetectorConfig;

use divergence_core::{DetectionError, ScanMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Root configuration structure containing all configuration categories
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application-wide settings
    pub app: AppConfig,

    /// Candle source and windowing
    pub data: DataConfig,

    /// Detection parameters
    pub detector: DetectorConfig,
}

/// Settings that loaded but cannot be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid detector configuration: {0}")]
    Detector(#[from] DetectionError),

    #[error("Invalid data configuration: {0}")]
    Data(String),
}

impl Settings {
    /// Load configuration from multiple sources with proper precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&Settings::default())?)
            // Add configuration file if it exists
            .add_source(
                config::File::with_name("divergence")
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            // Section and key are split on a double underscore so that
            // snake_case keys survive
            .add_source(
                config::Environment::with_prefix("DIVERGENCE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(path).format(config::FileFormat::Toml));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Merge command-line arguments into the loaded configuration
    pub fn merge_cli_args(mut self, cli_args: &dyn CliConfigMerge) -> Self {
        cli_args.merge_into_config(&mut self);
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.detector.validate()?;
        self.data.validate().map_err(SettingsError::Data)?;

        let aligned = self.data.aligned_len();
        if self.detector.scan_mode == ScanMode::TailGated && self.detector.tail_size > aligned {
            return Err(SettingsError::Detector(DetectionError::InsufficientData {
                needed: self.detector.tail_size,
                available: aligned,
            }));
        }

        Ok(())
    }
}

/// Trait for merging CLI arguments into configuration
pub trait CliConfigMerge {
    fn merge_into_config(&self, config: &mut Settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.app.name, "divergence");
        assert_eq!(settings.data.window_size, 80);
        assert_eq!(settings.detector.order, 4);
        assert_eq!(settings.detector.k, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();

        let toml_str = toml::to_string(&settings).expect("Failed to serialize to TOML");
        let parsed: Settings = toml::from_str(&toml_str).expect("Failed to deserialize from TOML");
        assert_eq!(parsed.detector, settings.detector);
        assert_eq!(parsed.data.candle_file, settings.data.candle_file);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[app]
log_level = "debug"

[data]
format = "csv"
window_size = 120

[detector]
order = 3
scan_mode = "tail_gated"
"#
        )
        .unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();

        assert_eq!(settings.app.log_level, LogLevel::Debug);
        assert_eq!(settings.data.format, CandleFormat::Csv);
        assert_eq!(settings.data.window_size, 120);
        assert_eq!(settings.data.rsi_period, 14);
        assert_eq!(settings.detector.order, 3);
        assert_eq!(settings.detector.k, 2);
        assert_eq!(settings.detector.scan_mode, ScanMode::TailGated);
    }

    struct Overrides {
        order: Option<usize>,
    }

    impl CliConfigMerge for Overrides {
        fn merge_into_config(&self, config: &mut Settings) {
            if let Some(order) = self.order {
                config.detector.order = order;
            }
        }
    }

    #[test]
    fn test_cli_merge_and_validation() {
        let settings = Settings::default().merge_cli_args(&Overrides { order: Some(0) });
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Detector(DetectionError::InvalidOrder { order: 0 }))
        ));

        let settings = Settings::default().merge_cli_args(&Overrides { order: None });
        assert_eq!(settings.detector.order, 4);
    }

    #[test]
    fn test_tail_must_fit_aligned_window() {
        let mut settings = Settings::default();
        settings.data.window_size = 16;
        settings.detector.tail_size = 3;
        assert!(settings.validate().is_ok());

        settings.detector.scan_mode = ScanMode::TailGated;

        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Detector(DetectionError::InsufficientData {
                needed: 3,
                available: 2
            }))
        ));

        settings.data.window_size = 14;
        assert!(matches!(settings.validate(), Err(SettingsError::Data(_))));
    }
}
