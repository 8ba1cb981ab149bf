//! Alert CLI commands

use clap::Subcommand;

use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::display::{format_alert_history, format_alerts};
use crate::error::SentinelResult;
use crate::models::OwnerId;
use crate::notify::JsonlAlertSink;
use crate::services::BudgetService;
use crate::storage::Storage;

/// Alert subcommands
#[derive(Subcommand)]
pub enum AlertsCommands {
    /// Show alerts the owner's budgets would raise right now
    Check,

    /// Show alerts delivered by past scans
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only this owner's alerts
        #[arg(long)]
        mine: bool,
    },
}

/// Handle an alerts command
pub fn handle_alerts_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    owner: OwnerId,
    cmd: AlertsCommands,
) -> SentinelResult<()> {
    match cmd {
        AlertsCommands::Check => {
            let service = BudgetService::new(storage, clock).with_thresholds(settings.alerts);
            let alerts = service.alerts_for_owner(owner)?;
            println!("{}", format_alerts(&alerts).trim_end());
        }

        AlertsCommands::History { limit, mine } => {
            let log = JsonlAlertSink::new(storage.paths().alerts_log());
            let mut records = log.read_all()?;
            if mine {
                records.retain(|r| r.alert.owner_id == owner);
            }
            let start = records.len().saturating_sub(limit);
            println!("{}", format_alert_history(&records[start..]).trim_end());
        }
    }

    Ok(())
}
