//! Transaction CLI commands

use clap::Subcommand;

use crate::clock::Clock;
use crate::config::settings::Settings;
use crate::display::format_transaction_list;
use crate::error::{SentinelError, SentinelResult};
use crate::models::{OwnerId, TransactionKind};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{parse_amount, parse_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Category key
        category: String,
        /// Amount (positive; use --kind for direction)
        amount: String,
        /// expense or income
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Memo
        #[arg(short, long)]
        memo: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// From date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// To date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Show at most this many
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (e.g., "txn-1a2b3c4d")
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    clock: &dyn Clock,
    owner: OwnerId,
    cmd: TransactionCommands,
) -> SentinelResult<()> {
    let service = TransactionService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            kind,
            date,
            memo,
        } => {
            let amount = parse_amount(&amount)?;
            let kind: TransactionKind = kind.parse().map_err(SentinelError::Validation)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => clock.today(),
            };

            let txn = service.add(owner, &category, kind, amount, date, memo)?;
            println!(
                "Recorded {} {} in '{}' on {} ({})",
                txn.kind,
                txn.amount.format_with_symbol(symbol),
                txn.category,
                txn.date,
                txn.id
            );
        }

        TransactionCommands::List {
            category,
            from,
            to,
            limit,
        } => {
            let filter = TransactionFilter {
                category,
                from: from.as_deref().map(parse_date).transpose()?,
                to: to.as_deref().map(parse_date).transpose()?,
                limit,
            };
            let transactions = service.list(owner, &filter)?;
            println!("{}", format_transaction_list(&transactions, symbol).trim_end());
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(owner, &id)?;
            println!("Deleted transaction {}", txn.id);
        }
    }

    Ok(())
}
