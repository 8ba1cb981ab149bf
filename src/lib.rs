//! Budget Sentinel - budget progress tracking and spending alerts
//!
//! This library reconciles per-category budgets against recorded spending,
//! projects each budget's end-of-period total, keeps budget windows of one
//! owner and category from overlapping, and raises alerts when spending
//! crosses configured thresholds. Alerts are produced on demand and by a
//! periodic scan over all owners.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Budgets, transactions, periods, progress and alerts
//! - `clock`: Injected time source
//! - `storage`: Store traits and the JSON file repositories
//! - `services`: Progress, overlap, alert and scan engine plus owner-facing services
//! - `notify`: Alert sinks
//! - `scheduler`: Cron-driven periodic scans
//! - `logging`: Tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel::clock::SystemClock;
//! use sentinel::config::{paths::SentinelPaths, settings::Settings};
//! use sentinel::services::BudgetService;
//! use sentinel::storage::Storage;
//!
//! let paths = SentinelPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! let service = BudgetService::new(&storage, &SystemClock).with_thresholds(settings.alerts);
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod services;
pub mod storage;

pub use error::{SentinelError, SentinelResult};
