//! Alert and scan report formatting

use crate::models::Alert;
use crate::notify::AlertRecord;
use crate::services::ScanReport;

pub fn format_alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No budgets above alert thresholds.".to_string();
    }

    let mut output = String::new();
    for alert in alerts {
        output.push_str(&format!("{:<12}  {}\n", alert.budget_id.to_string(), alert));
    }
    output
}

/// Format the alert history, oldest first
pub fn format_alert_history(records: &[AlertRecord]) -> String {
    if records.is_empty() {
        return "No alerts recorded.".to_string();
    }

    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{}  {:<9}  {}  {}\n",
            record.sent_at.format("%Y-%m-%d %H:%M"),
            record.alert.severity.to_string(),
            record.alert.owner_id,
            record.alert.message
        ));
    }
    output
}

/// Summarize one scan pass
pub fn format_scan_report(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scan at {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    output.push_str(&format!("  Owners scanned:     {}\n", report.owners_scanned));
    output.push_str(&format!("  Budgets evaluated:  {}\n", report.budgets_evaluated));
    if report.budgets_skipped > 0 {
        output.push_str(&format!(
            "  Budgets skipped:    {} (weekly/daily not scanned)\n",
            report.budgets_skipped
        ));
    }
    output.push_str(&format!("  Expired swept:      {}\n", report.deactivated));
    output.push_str(&format!("  Alerts sent:        {}\n", report.alerts_sent));
    if report.notify_failures > 0 {
        output.push_str(&format!("  Delivery failures:  {}\n", report.notify_failures));
    }

    if !report.failures.is_empty() {
        output.push_str(&format!("  Failed owners:      {}\n", report.failures.len()));
        for failure in &report.failures {
            output.push_str(&format!("    {}: {}\n", failure.owner, failure.error));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertSeverity, BudgetId, OwnerId};
    use crate::services::OwnerFailure;
    use chrono::{NaiveDate, Utc};

    fn alert() -> Alert {
        Alert {
            budget_id: BudgetId::new(),
            owner_id: OwnerId::new(3),
            category: "food".into(),
            severity: AlertSeverity::Critical,
            percentage_used: 104.0,
            days_remaining: 2,
            message: "Budget for 'food' is at 104.0%".into(),
        }
    }

    #[test]
    fn test_format_alerts() {
        assert!(format_alerts(&[]).starts_with("No budgets"));
        let output = format_alerts(&[alert()]);
        assert!(output.contains("[critical] Budget for 'food' is at 104.0%"));
    }

    #[test]
    fn test_format_history() {
        let record = AlertRecord {
            sent_at: Utc::now(),
            alert: alert(),
        };
        let output = format_alert_history(&[record]);
        assert!(output.contains("critical"));
        assert!(output.contains("owner-3"));
    }

    #[test]
    fn test_scan_report_lists_failures() {
        let report = ScanReport {
            started_at: NaiveDate::from_ymd_opt(2025, 8, 16)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            owners_scanned: 2,
            budgets_evaluated: 1,
            budgets_skipped: 1,
            alerts_sent: 1,
            notify_failures: 0,
            deactivated: 0,
            failures: vec![OwnerFailure {
                owner: OwnerId::new(1),
                error: "Storage error: timed out".into(),
            }],
        };

        let output = format_scan_report(&report);
        assert!(output.contains("Owners scanned:     2"));
        assert!(output.contains("weekly/daily not scanned"));
        assert!(output.contains("owner-1: Storage error: timed out"));
    }
}
