//! Scan CLI commands
//!
//! `scan run` performs one pass and prints the report; `scan watch` keeps
//! running passes on the configured cron schedule until interrupted.

use std::sync::Arc;

use clap::Subcommand;

use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::display::format_scan_report;
use crate::error::{SentinelError, SentinelResult};
use crate::notify::{FanoutSink, JsonlAlertSink, TracingSink};
use crate::scheduler::ScanScheduler;
use crate::storage::Storage;

/// Scan subcommands
#[derive(Subcommand)]
pub enum ScanCommands {
    /// Run one scan over all owners now
    Run {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run scans on the configured schedule until Ctrl-C
    Watch {
        /// Cron expression overriding the configured schedule
        #[arg(long)]
        schedule: Option<String>,
    },
}

/// Handle a scan command
pub fn handle_scan_command(
    storage: Storage,
    settings: &Settings,
    clock: Arc<dyn Clock>,
    cmd: ScanCommands,
) -> SentinelResult<()> {
    let sink = FanoutSink::new()
        .with(TracingSink)
        .with(JsonlAlertSink::new(storage.paths().alerts_log()));

    let mut scan_settings = settings.scan.clone();
    if let ScanCommands::Watch {
        schedule: Some(schedule),
    } = &cmd
    {
        scan_settings.schedule = schedule.clone();
    }

    let scheduler = ScanScheduler::new(
        Arc::new(storage),
        Arc::new(sink),
        clock,
        &scan_settings,
        settings.alerts,
    );

    match cmd {
        ScanCommands::Run { json } => {
            let report = scheduler.run_once()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_scan_report(&report));
            }
        }

        ScanCommands::Watch { .. } => {
            println!(
                "Watching budgets on schedule '{}' (Ctrl-C to stop)",
                scheduler.schedule()
            );
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| SentinelError::Scheduler(format!("Failed to start runtime: {}", e)))?;
            runtime.block_on(scheduler.start())?;
        }
    }

    Ok(())
}
