//! User settings for Budget Sentinel
//!
//! Alert thresholds, the scan schedule and logging preferences, persisted as
//! `config.json`. Every field has a default so partial files load.

use serde::{Deserialize, Serialize};

use super::paths::SentinelPaths;
use crate::error::SentinelError;
use crate::models::AlertThresholds;

/// Periodic scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Cron expression with a seconds field (sec min hour day month weekday)
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Deactivate budgets whose window has ended before each scan
    #[serde(default = "default_true")]
    pub sweep_expired: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            sweep_expired: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. "info" or "warn,sentinel=debug"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// User settings for Budget Sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in text output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub alerts: AlertThresholds,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_schedule() -> String {
    "0 0 6 * * *".to_string() // daily at 06:00
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            alerts: AlertThresholds::default(),
            scan: ScanSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &SentinelPaths) -> Result<Self, SentinelError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| SentinelError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| SentinelError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SentinelPaths) -> Result<(), SentinelError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SentinelError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SentinelError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), SentinelError> {
        self.alerts
            .validate()
            .map_err(|e| SentinelError::Config(format!("Invalid alert thresholds: {}", e)))?;

        if self.scan.schedule.split_whitespace().count() < 6 {
            return Err(SentinelError::Config(format!(
                "Scan schedule '{}' needs six cron fields (sec min hour day month weekday)",
                self.scan.schedule
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.alerts.warning, 80.0);
        assert_eq!(settings.alerts.critical, 100.0);
        assert_eq!(settings.scan.schedule, "0 0 6 * * *");
        assert!(settings.scan.sweep_expired);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.alerts = AlertThresholds::new(70.0, 95.0);
        settings.logging.format = LogFormat::Json;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"alerts": {"warning": 50}}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.alerts.warning, 50.0);
        assert_eq!(loaded.alerts.critical, 100.0);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_thresholds_rejected_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"alerts": {"warning": 120, "critical": 100}}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, SentinelError::Config(_)));
    }

    #[test]
    fn test_short_schedule_rejected() {
        let mut settings = Settings::default();
        settings.scan.schedule = "0 6 * * *".into();
        assert!(settings.validate().is_err());
    }
}
