//! Budget alerts
//!
//! Alerts are transient: produced by the evaluator, handed to a sink and
//! forgotten.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, OwnerId};

/// How close a budget is to its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Percentage-used levels at which alerts fire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_warning")]
    pub warning: f64,

    #[serde(default = "default_critical")]
    pub critical: f64,
}

fn default_warning() -> f64 {
    80.0
}

fn default_critical() -> f64 {
    100.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning: default_warning(),
            critical: default_critical(),
        }
    }
}

impl AlertThresholds {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }

    /// Thresholds must be finite, positive and ordered
    pub fn validate(&self) -> Result<(), String> {
        if !self.warning.is_finite() || !self.critical.is_finite() {
            return Err("alert thresholds must be finite numbers".into());
        }
        if self.warning <= 0.0 {
            return Err(format!(
                "warning threshold must be positive, got {}",
                self.warning
            ));
        }
        if self.warning > self.critical {
            return Err(format!(
                "warning threshold {} is above critical threshold {}",
                self.warning, self.critical
            ));
        }
        Ok(())
    }
}

/// A notification that a budget crossed a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub budget_id: BudgetId,
    pub owner_id: OwnerId,
    pub category: String,
    pub severity: AlertSeverity,
    pub percentage_used: f64,
    pub days_remaining: i64,
    pub message: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
