//! Cron-driven scan scheduler
//!
//! Runs [`BudgetScanner`] passes on a cron schedule. Each tick reloads the
//! JSON stores, so edits made by other processes are picked up. A tick that
//! fires while a scan is still running is skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::ScanSettings;
use crate::error::{SentinelError, SentinelResult};
use crate::models::AlertThresholds;
use crate::notify::NotificationSink;
use crate::services::{BudgetScanner, ScanReport};
use crate::storage::Storage;

/// Whether a scan is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
}

struct ScanContext {
    storage: Arc<Storage>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    thresholds: AlertThresholds,
    sweep_expired: bool,
    scanning: AtomicBool,
}

/// Resets the scanning flag when dropped
struct ScanningGuard<'a>(&'a AtomicBool);

impl Drop for ScanningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ScanContext {
    fn state(&self) -> ScanState {
        if self.scanning.load(Ordering::SeqCst) {
            ScanState::Scanning
        } else {
            ScanState::Idle
        }
    }

    fn try_begin(&self) -> Option<ScanningGuard<'_>> {
        self.scanning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ScanningGuard(&self.scanning))
    }

    /// One pass, or `None` when another pass holds the flag
    fn tick(&self) -> Option<SentinelResult<ScanReport>> {
        let _guard = match self.try_begin() {
            Some(guard) => guard,
            None => {
                warn!("Previous budget scan still running, skipping tick");
                return None;
            }
        };
        Some(self.scan())
    }

    fn scan(&self) -> SentinelResult<ScanReport> {
        self.storage.load_all()?;
        BudgetScanner::new(
            &self.storage.budgets,
            &self.storage.transactions,
            self.sink.as_ref(),
            self.clock.as_ref(),
        )
        .with_thresholds(self.thresholds)
        .with_sweep(self.sweep_expired)
        .run()
    }
}

/// Drives periodic budget scans
pub struct ScanScheduler {
    schedule: String,
    context: Arc<ScanContext>,
}

impl ScanScheduler {
    pub fn new(
        storage: Arc<Storage>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        settings: &ScanSettings,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            schedule: settings.schedule.clone(),
            context: Arc::new(ScanContext {
                storage,
                sink,
                clock,
                thresholds,
                sweep_expired: settings.sweep_expired,
                scanning: AtomicBool::new(false),
            }),
        }
    }

    pub fn schedule(&self) -> &str {
        &self.schedule
    }

    pub fn state(&self) -> ScanState {
        self.context.state()
    }

    /// Run a single pass now
    ///
    /// # Errors
    /// Returns `SentinelError::Scheduler` if a scheduled pass is in progress,
    /// or the scan's own error if the owner list cannot be read.
    pub fn run_once(&self) -> SentinelResult<ScanReport> {
        self.context
            .tick()
            .unwrap_or_else(|| Err(SentinelError::Scheduler("a scan is already running".into())))
    }

    /// Start the cron job and run until Ctrl-C
    ///
    /// # Errors
    /// Returns an error if the schedule is invalid or the scheduler fails to
    /// start.
    pub async fn start(self) -> SentinelResult<()> {
        info!(schedule = %self.schedule, "Starting budget scan scheduler");

        let mut scheduler = JobScheduler::new().await.map_err(scheduler_error)?;
        let context = Arc::clone(&self.context);

        let job = Job::new_async(self.schedule.as_str(), move |_uuid, _lock| {
            let context = Arc::clone(&context);
            Box::pin(async move {
                match tokio::task::spawn_blocking(move || context.tick()).await {
                    Ok(Some(Ok(report))) => {
                        if !report.is_clean() {
                            warn!(
                                failures = report.failures.len(),
                                notify_failures = report.notify_failures,
                                "Budget scan finished with failures"
                            );
                        }
                    }
                    Ok(Some(Err(e))) => error!(error = %e, "Budget scan failed"),
                    Ok(None) => {}
                    Err(e) => error!(error = %e, "Budget scan task panicked"),
                }
            })
        })
        .map_err(scheduler_error)?;

        scheduler.add(job).await.map_err(scheduler_error)?;
        scheduler.start().await.map_err(scheduler_error)?;

        info!("Budget scan scheduler started");

        tokio::signal::ctrl_c()
            .await
            .map_err(|e| SentinelError::Scheduler(format!("Failed to listen for Ctrl-C: {}", e)))?;

        info!("Shutting down budget scan scheduler");
        scheduler.shutdown().await.map_err(scheduler_error)?;
        Ok(())
    }
}

fn scheduler_error(err: impl std::fmt::Display) -> SentinelError {
    SentinelError::Scheduler(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::paths::SentinelPaths;
    use crate::models::{Money, NewBudget, OwnerId, PeriodKind, Transaction};
    use crate::notify::MemorySink;
    use crate::storage::BudgetStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn setup() -> (TempDir, ScanScheduler, Arc<MemorySink>) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        let owner = OwnerId::new(1);
        storage
            .budgets
            .create(NewBudget::for_period(
                owner,
                "food",
                Money::from_cents(10_000),
                PeriodKind::Monthly,
                date(1),
            ))
            .unwrap();
        storage
            .transactions
            .insert(Transaction::expense(owner, "food", Money::from_cents(10_500), date(5)))
            .unwrap();
        storage.save_all().unwrap();

        let sink = Arc::new(MemorySink::new());
        let clock = Arc::new(FixedClock::new(date(16).and_hms_opt(6, 0, 0).unwrap()));
        let scheduler = ScanScheduler::new(
            Arc::new(storage),
            sink.clone(),
            clock,
            &ScanSettings::default(),
            AlertThresholds::default(),
        );
        (temp_dir, scheduler, sink)
    }

    #[test]
    fn test_run_once_scans_and_returns_to_idle() {
        let (_temp_dir, scheduler, sink) = setup();
        assert_eq!(scheduler.state(), ScanState::Idle);

        let report = scheduler.run_once().unwrap();
        assert_eq!(report.alerts_sent, 1);
        assert_eq!(sink.alerts().len(), 1);
        assert_eq!(scheduler.state(), ScanState::Idle);
    }

    #[test]
    fn test_tick_is_skipped_while_scanning() {
        let (_temp_dir, scheduler, sink) = setup();

        let guard = scheduler.context.try_begin().unwrap();
        assert_eq!(scheduler.state(), ScanState::Scanning);
        assert!(scheduler.context.tick().is_none());
        assert!(matches!(scheduler.run_once(), Err(SentinelError::Scheduler(_))));
        drop(guard);

        assert_eq!(scheduler.state(), ScanState::Idle);
        assert!(scheduler.run_once().is_ok());
        assert_eq!(sink.alerts().len(), 1);
    }

    #[test]
    fn test_each_tick_reloads_from_disk() {
        let (temp_dir, scheduler, sink) = setup();

        // Another process adds a second over-budget category
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        let other = Storage::open(paths).unwrap();
        other
            .budgets
            .create(NewBudget::for_period(
                OwnerId::new(2),
                "rent",
                Money::from_cents(1_000),
                PeriodKind::Monthly,
                date(1),
            ))
            .unwrap();
        other
            .transactions
            .insert(Transaction::expense(OwnerId::new(2), "rent", Money::from_cents(900), date(2)))
            .unwrap();
        other.save_all().unwrap();

        let report = scheduler.run_once().unwrap();
        assert_eq!(report.owners_scanned, 2);
        assert_eq!(sink.alerts().len(), 2);
    }

    #[test]
    fn test_schedule_comes_from_settings() {
        let (_temp_dir, scheduler, _sink) = setup();
        assert_eq!(scheduler.schedule(), "0 0 6 * * *");
    }
}
