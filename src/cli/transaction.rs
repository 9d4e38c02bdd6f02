//! CLI commands for transactions
//!
//! Record entry, listing, CSV export, and deletion of transaction records.

use chrono::NaiveDate;
use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::display::format_transaction_register;
use crate::error::{FintrackError, FintrackResult};
use crate::export::export_transactions_csv;
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::Storage;

use super::parse_date;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Add a new transaction record
    Add {
        /// Record kind: income or expense
        kind: String,

        /// Amount, e.g. "12.50"
        amount: String,

        /// Category name (defaults to "Uncategorized")
        #[arg(short, long)]
        category: Option<String>,

        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// List transactions
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Filter by kind: income or expense
        #[arg(short, long)]
        kind: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Export transactions to CSV
    Export {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Delete a transaction by id
    Delete {
        /// Transaction id (full UUID or the short "txn-xxxxxxxx" form)
        id: String,
    },
}

/// Handle transaction commands
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
    today: NaiveDate,
) -> FintrackResult<()> {
    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => handle_add(storage, settings, kind, amount, category, date, description, today),
        TransactionCommands::List {
            start,
            end,
            kind,
            limit,
        } => handle_list(storage, settings, start, end, kind, limit),
        TransactionCommands::Export { start, end, output } => {
            handle_export(storage, settings, start, end, output)
        }
        TransactionCommands::Delete { id } => handle_delete(storage, settings, id),
    }
}

/// Handle adding a record
#[allow(clippy::too_many_arguments)]
fn handle_add(
    storage: &Storage,
    settings: &Settings,
    kind: String,
    amount: String,
    category: Option<String>,
    date: Option<String>,
    description: Option<String>,
    today: NaiveDate,
) -> FintrackResult<()> {
    let kind: TransactionKind = kind
        .parse()
        .map_err(|e| FintrackError::Validation(format!("{}", e)))?;

    let amount = Money::parse(&amount)
        .map_err(|e| FintrackError::Validation(format!("{}", e)))?;

    let date = match date {
        Some(s) => parse_date(&s)?,
        None => today,
    };

    let txn = Transaction::with_details(
        settings.user_id,
        kind,
        amount,
        date,
        category.unwrap_or_default(),
        description.unwrap_or_default(),
    );

    txn.validate(today)
        .map_err(|e| FintrackError::Validation(e.to_string()))?;

    let id = txn.id;
    let display_amount = txn.amount.format_with_symbol(&settings.currency_symbol);
    let display_category = txn.category.clone();

    storage.transactions.upsert(txn)?;
    storage.transactions.save()?;

    println!(
        "Added {} {} ({}) on {} [{}]",
        kind, display_amount, display_category, date, id
    );
    Ok(())
}

/// Handle listing records
fn handle_list(
    storage: &Storage,
    settings: &Settings,
    start: Option<String>,
    end: Option<String>,
    kind: Option<String>,
    limit: usize,
) -> FintrackResult<()> {
    let start = start.as_deref().map(parse_date).transpose()?;
    let end = end.as_deref().map(parse_date).transpose()?;
    let kind: Option<TransactionKind> = kind
        .as_deref()
        .map(|k| {
            k.parse()
                .map_err(|e| FintrackError::Validation(format!("{}", e)))
        })
        .transpose()?;

    let transactions: Vec<_> = storage
        .transactions
        .get_for_user(settings.user_id)?
        .into_iter()
        .filter(|t| start.map_or(true, |s| t.date >= s))
        .filter(|t| end.map_or(true, |e| t.date <= e))
        .filter(|t| kind.map_or(true, |k| t.kind == k))
        .take(limit)
        .collect();

    print!("{}", format_transaction_register(&transactions));
    Ok(())
}

/// Handle exporting records to CSV
fn handle_export(
    storage: &Storage,
    settings: &Settings,
    start: Option<String>,
    end: Option<String>,
    output: PathBuf,
) -> FintrackResult<()> {
    let start = start.as_deref().map(parse_date).transpose()?;
    let end = end.as_deref().map(parse_date).transpose()?;

    let transactions: Vec<_> = storage
        .transactions
        .get_for_user(settings.user_id)?
        .into_iter()
        .filter(|t| start.map_or(true, |s| t.date >= s))
        .filter(|t| end.map_or(true, |e| t.date <= e))
        .collect();

    let file = File::create(&output).map_err(|e| {
        FintrackError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export_transactions_csv(&transactions, &mut writer)?;

    println!(
        "Exported {} transactions to: {}",
        transactions.len(),
        output.display()
    );
    Ok(())
}

/// Handle deleting a record
fn handle_delete(storage: &Storage, settings: &Settings, id: String) -> FintrackResult<()> {
    // Accept a full UUID, or the short display form shown in listings
    let target = storage
        .transactions
        .get_for_user(settings.user_id)?
        .into_iter()
        .find(|t| t.id.to_string() == id || t.id.as_uuid().to_string() == id)
        .ok_or_else(|| FintrackError::transaction_not_found(&id))?;

    storage.transactions.delete(target.id)?;
    storage.transactions.save()?;

    println!("Deleted transaction {}", target.id);
    Ok(())
}
