//! Budget CLI commands
//!
//! Implements CLI commands for budget management: creating and editing
//! budgets, listing them and showing their progress.

use clap::Subcommand;

use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::display::{format_budget_details, format_budget_list, format_progress_list};
use crate::error::{SentinelError, SentinelResult};
use crate::models::{BudgetPatch, NewBudget, OwnerId, PeriodKind};
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for a category
    ///
    /// Without --start/--end the budget covers the current calendar window of
    /// its period (this month, this week or today).
    Create {
        /// Category key (e.g., "groceries")
        category: String,
        /// Amount (e.g., "500" or "500.00")
        amount: String,
        /// Period kind: monthly, weekly or daily
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// First day of the window (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Last day of the window (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
    },

    /// List budgets
    List {
        /// Include inactive budgets
        #[arg(short, long)]
        all: bool,
    },

    /// Show a budget with its progress
    Show {
        /// Budget ID (e.g., "bud-1a2b3c4d")
        id: String,
    },

    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New period kind
        #[arg(short, long)]
        period: Option<String>,
        /// New first day
        #[arg(long)]
        start: Option<String>,
        /// New last day
        #[arg(long)]
        end: Option<String>,
    },

    /// Stop tracking a budget without deleting it
    Deactivate {
        /// Budget ID
        id: String,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },

    /// Show progress of all active budgets
    Progress,

    /// Deactivate budgets whose window has ended
    Sweep,

    /// Delete every budget and transaction of the owner
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    owner: OwnerId,
    cmd: BudgetCommands,
) -> SentinelResult<()> {
    let service = BudgetService::new(storage, clock).with_thresholds(settings.alerts);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create {
            category,
            amount,
            period,
            start,
            end,
        } => {
            let amount = parse_amount(&amount)?;
            let kind = parse_period(&period)?;

            let new = match (start, end) {
                (Some(start), Some(end)) => NewBudget::new(
                    owner,
                    category,
                    amount,
                    kind,
                    parse_date(&start)?,
                    parse_date(&end)?,
                ),
                _ => NewBudget::for_period(owner, category, amount, kind, clock.today()),
            };

            let budget = service.create(new)?;
            println!("Created budget {} for '{}'", budget.id, budget.category);
            println!(
                "  {} {} over {}",
                budget.amount.format_with_symbol(symbol),
                budget.period_kind,
                budget.window()
            );
        }

        BudgetCommands::List { all } => {
            let budgets = service.list(owner, all)?;
            println!("{}", format_budget_list(&budgets, symbol).trim_end());
        }

        BudgetCommands::Show { id } => {
            let budget = service.find(owner, &id)?;
            let progress = service.progress(budget.id, owner)?;
            print!("{}", format_budget_details(&progress, symbol));
        }

        BudgetCommands::Edit {
            id,
            amount,
            period,
            start,
            end,
        } => {
            let budget = service.find(owner, &id)?;
            let patch = BudgetPatch {
                amount: amount.as_deref().map(parse_amount).transpose()?,
                period_kind: period.as_deref().map(parse_period).transpose()?,
                start_date: start.as_deref().map(parse_date).transpose()?,
                end_date: end.as_deref().map(parse_date).transpose()?,
                active: None,
            };

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }

            let updated = service.update(budget.id, owner, &patch)?;
            println!("Updated budget {}: {}", updated.id, updated);
        }

        BudgetCommands::Deactivate { id } => {
            let budget = service.find(owner, &id)?;
            let updated = service.deactivate(budget.id, owner)?;
            println!("Deactivated budget {} ({})", updated.id, updated.category);
        }

        BudgetCommands::Delete { id } => {
            let budget = service.find(owner, &id)?;
            service.delete(budget.id, owner)?;
            println!("Deleted budget {} ({})", budget.id, budget.category);
        }

        BudgetCommands::Progress => {
            let progress = service.progress_for_owner(owner)?;
            println!("{}", format_progress_list(&progress, symbol).trim_end());
        }

        BudgetCommands::Sweep => {
            let count = service.sweep_expired()?;
            println!("Deactivated {} expired budget(s)", count);
        }

        BudgetCommands::Purge { yes } => {
            if !yes {
                return Err(SentinelError::Validation(
                    "Purging deletes all budgets and transactions; pass --yes to confirm".into(),
                ));
            }
            let (budgets, transactions) = service.delete_owner(owner)?;
            println!(
                "Deleted {} budget(s) and {} transaction(s) for {}",
                budgets, transactions, owner
            );
        }
    }

    Ok(())
}

fn parse_period(s: &str) -> SentinelResult<PeriodKind> {
    s.parse::<PeriodKind>()
        .map_err(|e| SentinelError::Validation(e.to_string()))
}
