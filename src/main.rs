use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use pipeline::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The entry point for the Tradelens transaction analytics runner.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => configuration::load_config().with_context(|| {
            format!("loading configuration from {}", configuration::DEFAULT_CONFIG_FILE)
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    let csv_path = cli.csv.unwrap_or(config.data.transactions_path);
    let mut pipeline = Pipeline::from_path(&csv_path);
    pipeline
        .run()
        .with_context(|| format!("processing {}", csv_path.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Summary => handle_summary(&pipeline, config.report.top_n)?,
        Commands::Export(args) => handle_export(&pipeline, args)?,
        Commands::Query(args) => handle_query(&pipeline, args)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Validates a brokerage transaction file and reports aggregate analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file [default: config.toml].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides `data.transactions_path` from the configuration.
    #[arg(long)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline figures and the compact prompt summary.
    Summary,
    /// Print the analytics bundle as JSON.
    Export(ExportArgs),
    /// List cleaned transactions matching a lookup.
    Query(QueryArgs),
}

#[derive(Parser)]
struct ExportArgs {
    /// Write the JSON to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
struct QueryArgs {
    #[command(subcommand)]
    by: QueryBy,
}

#[derive(Subcommand)]
enum QueryBy {
    /// Transactions for one ticker (case-insensitive).
    Ticker { ticker: String },
    /// Transactions for one trader (case-insensitive).
    Trader { trader_id: String },
    /// Transactions between two inclusive bounds, e.g. 2024-01-01 2024-01-31.
    Range { start: String, end: String },
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_summary(pipeline: &Pipeline, top_n: usize) -> anyhow::Result<()> {
    let stats = pipeline.summary()?;
    let report = pipeline.cleaning_report()?;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Transactions".to_string(), stats.total_transactions.to_string()]);
    table.add_row(vec!["Total volume".to_string(), stats.total_volume]);
    table.add_row(vec!["Unique tickers".to_string(), stats.unique_tickers.to_string()]);
    table.add_row(vec!["Unique traders".to_string(), stats.unique_traders.to_string()]);
    table.add_row(vec!["Date range".to_string(), stats.date_range]);
    table.add_row(vec!["Top ticker by volume".to_string(), stats.top_ticker_by_volume]);
    table.add_row(vec!["Most active trader".to_string(), stats.most_active_trader]);
    table.add_row(vec!["Rows dropped".to_string(), report.total_dropped().to_string()]);
    println!("{table}");

    println!("\n{}", analytics::prompt_summary(pipeline.analytics()?, top_n));
    Ok(())
}

fn handle_export(pipeline: &Pipeline, args: ExportArgs) -> anyhow::Result<()> {
    let json = pipeline.export_json()?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing analytics to {}", path.display()))?;
            tracing::info!("Analytics written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn handle_query(pipeline: &Pipeline, args: QueryArgs) -> anyhow::Result<()> {
    let rows = match &args.by {
        QueryBy::Ticker { ticker } => pipeline.by_ticker(ticker)?,
        QueryBy::Trader { trader_id } => pipeline.by_trader(trader_id)?,
        QueryBy::Range { start, end } => pipeline.by_time_range(start, end)?,
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Timestamp", "Ticker", "Action", "Quantity", "Price", "Trader", "Total value",
    ]);
    for tx in &rows {
        table.add_row(vec![
            tx.timestamp.to_string(),
            tx.ticker.clone(),
            tx.action.to_string(),
            tx.quantity.to_string(),
            format!("{:.2}", tx.price),
            tx.trader_id.clone(),
            format!("{:.2}", tx.total_value),
        ]);
    }
    println!("{table}");
    println!("{} matching transactions", rows.len());
    Ok(())
}
