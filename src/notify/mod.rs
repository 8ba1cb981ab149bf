//! Alert delivery
//!
//! The engine hands every alert to a [`NotificationSink`] and does not track
//! what happens next. Sinks here cover logging, an append-only history file
//! and in-memory collection.

pub mod jsonl;

pub use jsonl::{AlertRecord, JsonlAlertSink};

use std::sync::Mutex;

use tracing::{error, warn};

use crate::error::{SentinelError, SentinelResult};
use crate::models::{Alert, AlertSeverity};

/// Destination for budget alerts
pub trait NotificationSink: Send + Sync {
    fn send(&self, alert: &Alert) -> SentinelResult<()>;
}

/// Emits alerts as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn send(&self, alert: &Alert) -> SentinelResult<()> {
        match alert.severity {
            AlertSeverity::Critical => error!(
                owner = %alert.owner_id,
                budget = %alert.budget_id,
                category = %alert.category,
                pct = alert.percentage_used,
                "{}",
                alert.message
            ),
            AlertSeverity::Warning => warn!(
                owner = %alert.owner_id,
                budget = %alert.budget_id,
                category = %alert.category,
                pct = alert.percentage_used,
                "{}",
                alert.message
            ),
        }
        Ok(())
    }
}

/// Collects alerts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    alerts: Mutex<Vec<Alert>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything sent so far
    pub fn drain(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|mut alerts| std::mem::take(&mut *alerts))
            .unwrap_or_default()
    }
}

impl NotificationSink for MemorySink {
    fn send(&self, alert: &Alert) -> SentinelResult<()> {
        let mut alerts = self
            .alerts
            .lock()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire alert lock: {}", e)))?;
        alerts.push(alert.clone());
        Ok(())
    }
}

/// Forwards each alert to several sinks
///
/// Every sink is tried; the first failure is returned afterwards.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotificationSink for FanoutSink {
    fn send(&self, alert: &Alert) -> SentinelResult<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.send(alert) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
