//! Configuration module for Budget Sentinel
//!
//! - XDG-compliant path resolution
//! - Settings persistence (alert thresholds, scan schedule, logging)

pub mod paths;
pub mod settings;

pub use paths::SentinelPaths;
pub use settings::{LogFormat, LoggingSettings, ScanSettings, Settings};
