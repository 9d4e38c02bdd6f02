//! CLI commands for reports
//!
//! Provides commands for generating and exporting the period summary and the
//! multi-month trend report.

use chrono::NaiveDate;
use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{FintrackError, FintrackResult};
use crate::models::DateWindow;
use crate::reports::{PeriodSummary, TrendReport};
use crate::storage::Storage;

use super::parse_date;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Financial summary for a single period
    Summary {
        /// Start date (YYYY-MM-DD), defaults to the first of the current month
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), defaults to the last day of the current month
        #[arg(short, long)]
        end: Option<String>,

        /// Calendar month to report on (YYYY-MM), alternative to start/end
        #[arg(short, long, conflicts_with_all = ["start", "end"])]
        month: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Multi-month trend analysis
    Trends {
        /// Number of months to analyze, ending with the current month
        #[arg(short, long)]
        months: Option<u32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
    today: NaiveDate,
) -> FintrackResult<()> {
    match cmd {
        ReportCommands::Summary {
            start,
            end,
            month,
            output,
            json,
        } => handle_summary_report(storage, settings, start, end, month, output, json, today),
        ReportCommands::Trends {
            months,
            output,
            json,
        } => handle_trends_report(storage, settings, months, output, json, today),
    }
}

/// Handle the period summary report
#[allow(clippy::too_many_arguments)]
fn handle_summary_report(
    storage: &Storage,
    settings: &Settings,
    start: Option<String>,
    end: Option<String>,
    month: Option<String>,
    output: Option<PathBuf>,
    json: bool,
    today: NaiveDate,
) -> FintrackResult<()> {
    let window = if let Some(month_str) = month {
        DateWindow::parse_month(&month_str).map_err(|e| {
            FintrackError::Validation(format!(
                "Invalid month format: {}. Use YYYY-MM (e.g., 2025-01)",
                e
            ))
        })?
    } else {
        let current = DateWindow::month_of(today);
        let start_date = match start {
            Some(s) => parse_date(&s)?,
            None => current.start(),
        };
        let end_date = match end {
            Some(e) => parse_date(&e)?,
            None => current.end(),
        };
        DateWindow::new(start_date, end_date)?
    };

    let summary = PeriodSummary::generate(&storage.transactions, settings.user_id, window)?;

    write_report(output, json, &summary, |s, w| s.export_csv(w), |s| {
        s.format_terminal()
    })
}

/// Handle the trend report
fn handle_trends_report(
    storage: &Storage,
    settings: &Settings,
    months: Option<u32>,
    output: Option<PathBuf>,
    json: bool,
    today: NaiveDate,
) -> FintrackResult<()> {
    let months = months.unwrap_or(settings.trend_months);

    let report = TrendReport::generate(&storage.transactions, settings.user_id, months, today)?;

    write_report(output, json, &report, |r, w| r.export_csv(w), |r| {
        r.format_terminal()
    })
}

/// Common output plumbing: CSV file, JSON, or terminal text
fn write_report<R: serde::Serialize>(
    output: Option<PathBuf>,
    json: bool,
    report: &R,
    export_csv: impl Fn(&R, &mut BufWriter<File>) -> FintrackResult<()>,
    format_terminal: impl Fn(&R) -> String,
) -> FintrackResult<()> {
    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| {
            FintrackError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        export_csv(report, &mut writer)?;
        println!("Report exported to: {}", path.display());
    } else if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", format_terminal(report));
    }

    Ok(())
}
