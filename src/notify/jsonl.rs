//! Append-only alert history
//!
//! Each delivered alert is written as a single JSON line and flushed
//! immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SentinelError, SentinelResult};
use crate::models::Alert;

use super::NotificationSink;

/// One line of the alert history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub sent_at: DateTime<Utc>,

    #[serde(flatten)]
    pub alert: Alert,
}

/// Writes alerts to a JSONL file
pub struct JsonlAlertSink {
    log_path: PathBuf,
}

impl JsonlAlertSink {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Append one record
    pub fn append(&self, record: &AlertRecord) -> SentinelResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| SentinelError::Io(format!("Failed to open alert log: {}", e)))?;

        let json = serde_json::to_string(record)
            .map_err(|e| SentinelError::Json(format!("Failed to serialize alert: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| SentinelError::Io(format!("Failed to write alert: {}", e)))?;

        file.flush()
            .map_err(|e| SentinelError::Io(format!("Failed to flush alert log: {}", e)))?;

        Ok(())
    }

    /// Read the whole history, oldest first
    pub fn read_all(&self) -> SentinelResult<Vec<AlertRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SentinelError::Io(format!("Failed to open alert log: {}", e)))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                SentinelError::Io(format!("Failed to read alert log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AlertRecord = serde_json::from_str(&line).map_err(|e| {
                SentinelError::Json(format!(
                    "Failed to parse alert at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// The most recent `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> SentinelResult<Vec<AlertRecord>> {
        let mut all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all.split_off(start))
    }
}

impl NotificationSink for JsonlAlertSink {
    fn send(&self, alert: &Alert) -> SentinelResult<()> {
        self.append(&AlertRecord {
            sent_at: Utc::now(),
            alert: alert.clone(),
        })
    }
}
