use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sentinel::cli::{
    handle_alerts_command, handle_budget_command, handle_scan_command,
    handle_transaction_command, AlertsCommands, BudgetCommands, ScanCommands,
    TransactionCommands,
};
use sentinel::clock::{Clock, FixedClock, SystemClock};
use sentinel::config::{paths::SentinelPaths, settings::Settings};
use sentinel::models::OwnerId;
use sentinel::storage::Storage;

#[derive(Parser)]
#[command(
    name = "sentinel",
    version,
    about = "Budget progress tracking and spending alerts",
    long_about = "Budget Sentinel tracks per-category budgets against recorded \
                  spending, projects where each budget will land, and raises \
                  alerts when spending approaches or exceeds a limit."
)]
struct Cli {
    /// Owner to act as
    #[arg(long, global = true, env = "SENTINEL_OWNER", default_value = "1")]
    owner: u64,

    /// Evaluate as of this date (YYYY-MM-DD, noon) instead of now
    #[arg(long, global = true, env = "SENTINEL_AS_OF")]
    as_of: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Budget scans over all owners
    #[command(subcommand)]
    Scan(ScanCommands),

    /// Alert preview and history
    #[command(subcommand)]
    Alerts(AlertsCommands),

    /// Write default settings if none exist
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SentinelPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    sentinel::logging::init(&settings.logging, cli.verbose);

    let clock: Arc<dyn Clock> = match cli.as_of.as_deref() {
        Some(date) => {
            let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid --as-of date '{}'", date))?;
            let noon = date
                .and_hms_opt(12, 0, 0)
                .context("Invalid --as-of time")?;
            Arc::new(FixedClock::new(noon))
        }
        None => Arc::new(SystemClock),
    };
    let owner = OwnerId::new(cli.owner);

    match cli.command {
        Some(Commands::Budget(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_budget_command(&storage, &settings, clock.as_ref(), owner, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_transaction_command(&storage, &settings, clock.as_ref(), owner, cmd)?;
        }
        Some(Commands::Scan(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_scan_command(storage, &settings, clock, cmd)?;
        }
        Some(Commands::Alerts(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_alerts_command(&storage, &settings, clock.as_ref(), owner, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Budget Sentinel at: {}", paths.base_dir().display());
            Storage::new(paths.clone())?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            println!("Initialization complete!");
        }
        Some(Commands::Config) => {
            println!("Budget Sentinel Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Alert history:    {}", paths.alerts_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Warning threshold:  {}%", settings.alerts.warning);
            println!("  Critical threshold: {}%", settings.alerts.critical);
            println!("  Scan schedule:      {}", settings.scan.schedule);
            println!("  Sweep expired:      {}", settings.scan.sweep_expired);
            println!("  Log level:          {}", settings.logging.level);
        }
        None => {
            println!("Budget Sentinel - budget progress and alerts");
            println!();
            println!("Run 'sentinel --help' for usage information.");
        }
    }

    Ok(())
}
