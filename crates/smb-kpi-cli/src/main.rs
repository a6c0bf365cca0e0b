mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analysis::{KpisArgs, QualityArgs, TrendsArgs};
use commands::format::{FormatCurrencyArgs, FormatPercentageArgs};

/// Financial KPI reports for small and medium businesses
#[derive(Parser)]
#[command(
    name = "smbkpi",
    version,
    about = "Financial KPI reports for small and medium businesses",
    long_about = "Computes liquidity, profitability, efficiency, leverage, cash-flow and \
                  growth KPIs from balance sheet, income statement and cash flow snapshots, \
                  classifies each against its thresholds, and shows the arithmetic behind \
                  every number. Set SMBKPI_LOG=debug for calculation traces on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate and classify every KPI for the latest snapshot
    Kpis(KpisArgs),
    /// Period-over-period trends for each KPI and headline line items
    Trends(TrendsArgs),
    /// Consistency checks over the snapshot series
    Quality(QualityArgs),
    /// List KPI definitions, thresholds and source fields
    Catalog,
    /// Format an amount as currency
    FormatCurrency(FormatCurrencyArgs),
    /// Format a fraction as a percentage
    FormatPercentage(FormatPercentageArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SMBKPI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Kpis(args) => commands::analysis::run_kpis(args),
        Commands::Trends(args) => commands::analysis::run_trends(args),
        Commands::Quality(args) => commands::analysis::run_quality(args),
        Commands::Catalog => commands::catalog::run_catalog(),
        Commands::FormatCurrency(args) => commands::format::run_format_currency(args),
        Commands::FormatPercentage(args) => commands::format::run_format_percentage(args),
        Commands::Version => {
            println!("smbkpi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
