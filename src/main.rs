use anyhow::Result;
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_report_command, handle_transaction_command, ReportCommands, TransactionCommands,
};
use fintrack::config::{paths::FintrackPaths, settings::Settings};
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Terminal-based personal finance tracker",
    long_about = "FinTrack is a terminal-based personal finance tracker. It records \
                  income and expense transactions and turns them into monthly \
                  summaries and multi-month trend reports with per-category \
                  breakdowns and growth metrics."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    // Reports and validation anchor on the local calendar date
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd, today)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd, today)?;
        }
        Some(Commands::Init) => {
            println!("Initializing FinTrack at: {}", paths.data_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Record your first transaction with:");
            println!("  fintrack transaction add expense 12.50 --category Food");
            println!("Then try 'fintrack report summary'.");
        }
        Some(Commands::Config) => {
            println!("FinTrack Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Profile:        {}", settings.user_id);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Trend months:   {}", settings.trend_months);
        }
        None => {
            println!("FinTrack - Terminal-based personal finance tracker");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack report summary' for the current month's numbers.");
        }
    }

    Ok(())
}
