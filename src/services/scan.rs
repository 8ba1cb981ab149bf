//! Periodic budget scan
//!
//! One pass over every owner holding an active budget: sweep expired budgets,
//! recompute progress, evaluate thresholds and hand alerts to the sink.
//! Owners are processed one at a time and a failure inside one owner never
//! stops the others.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::SentinelResult;
use crate::models::{Alert, AlertThresholds, OwnerId, PeriodKind};
use crate::notify::NotificationSink;
use crate::storage::{BudgetStore, TransactionStore};

use super::alert::AlertEvaluator;
use super::progress::ProgressCalculator;

/// An owner whose budgets could not be evaluated in a scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerFailure {
    pub owner: OwnerId,
    pub error: String,
}

/// Outcome of one scan pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub started_at: NaiveDateTime,
    pub owners_scanned: usize,
    pub budgets_evaluated: usize,
    /// Budgets whose period kind the scan does not handle yet
    pub budgets_skipped: usize,
    pub alerts_sent: usize,
    pub notify_failures: usize,
    /// Budgets deactivated by the expiry sweep
    pub deactivated: usize,
    pub failures: Vec<OwnerFailure>,
}

impl ScanReport {
    fn new(started_at: NaiveDateTime) -> Self {
        Self {
            started_at,
            owners_scanned: 0,
            budgets_evaluated: 0,
            budgets_skipped: 0,
            alerts_sent: 0,
            notify_failures: 0,
            deactivated: 0,
            failures: Vec::new(),
        }
    }

    /// True when no owner failed and every alert was delivered
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.notify_failures == 0
    }
}

/// Runs scan passes over the budget store
pub struct BudgetScanner<'a> {
    budgets: &'a dyn BudgetStore,
    transactions: &'a dyn TransactionStore,
    sink: &'a dyn NotificationSink,
    clock: &'a dyn Clock,
    calculator: ProgressCalculator,
    evaluator: AlertEvaluator,
    sweep_expired: bool,
}

impl<'a> BudgetScanner<'a> {
    pub fn new(
        budgets: &'a dyn BudgetStore,
        transactions: &'a dyn TransactionStore,
        sink: &'a dyn NotificationSink,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            budgets,
            transactions,
            sink,
            clock,
            calculator: ProgressCalculator::new(),
            evaluator: AlertEvaluator::default(),
            sweep_expired: true,
        }
    }

    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.evaluator = AlertEvaluator::new(thresholds);
        self
    }

    pub fn with_sweep(mut self, sweep_expired: bool) -> Self {
        self.sweep_expired = sweep_expired;
        self
    }

    /// Run one full pass
    ///
    /// Only a failure to list owners aborts the run. Everything after that is
    /// recorded in the report. There is no retry and no memory of earlier
    /// runs, so a budget above a threshold alerts on every pass.
    pub fn run(&self) -> SentinelResult<ScanReport> {
        let now = self.clock.now();
        let mut report = ScanReport::new(now);

        if self.sweep_expired {
            match self.budgets.deactivate_expired(now.date()) {
                Ok(count) => {
                    if count > 0 {
                        info!(count, "Deactivated expired budgets");
                    }
                    report.deactivated = count;
                }
                Err(e) => error!(error = %e, "Expired budget sweep failed"),
            }
        }

        let owners = self.budgets.list_active_owners()?;
        debug!(owners = owners.len(), "Starting budget scan");

        for owner in owners {
            report.owners_scanned += 1;
            match self.scan_owner(owner, now, &mut report) {
                Ok(alerts) => self.deliver(owner, &alerts, &mut report),
                Err(e) => {
                    error!(owner = %owner, error = %e, "Budget scan failed for owner");
                    report.failures.push(OwnerFailure {
                        owner,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            owners = report.owners_scanned,
            evaluated = report.budgets_evaluated,
            skipped = report.budgets_skipped,
            alerts = report.alerts_sent,
            failures = report.failures.len(),
            "Budget scan finished"
        );

        Ok(report)
    }

    fn scan_owner(
        &self,
        owner: OwnerId,
        now: NaiveDateTime,
        report: &mut ScanReport,
    ) -> SentinelResult<Vec<Alert>> {
        let budgets = self.budgets.list_active(owner, None)?;
        let month = PeriodKind::Monthly.window_containing(now.date());
        let mut alerts = Vec::new();

        for budget in &budgets {
            match budget.period_kind {
                PeriodKind::Monthly => {
                    let spent = self.transactions.sum_expenses(
                        owner,
                        &budget.category,
                        month.start,
                        month.end,
                    )?;
                    let progress = self.calculator.calculate(budget, spent, now)?;
                    report.budgets_evaluated += 1;

                    if let Some(alert) = self.evaluator.evaluate(&progress) {
                        alerts.push(alert);
                    }
                }
                PeriodKind::Weekly | PeriodKind::Daily => {
                    debug!(
                        budget = %budget.id,
                        kind = %budget.period_kind,
                        "Scanning not implemented for period kind, skipping"
                    );
                    report.budgets_skipped += 1;
                }
            }
        }

        Ok(alerts)
    }

    fn deliver(&self, owner: OwnerId, alerts: &[Alert], report: &mut ScanReport) {
        for alert in alerts {
            match self.sink.send(alert) {
                Ok(()) => report.alerts_sent += 1,
                Err(e) => {
                    warn!(owner = %owner, budget = %alert.budget_id, error = %e, "Alert delivery failed");
                    report.notify_failures += 1;
                }
            }
        }
    }
}
