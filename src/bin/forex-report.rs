//! forex-report CLI - Dual-axis forex rate charts in the terminal
//!
//! Fetches two currency pairs from Fixer.io over a trailing window and
//! draws them against independent y-axes.
//!
//! ## Example Usage
//!
//! ```bash
//! # Stock report: USD-EUR and MXN-EUR over the configured window
//! FIXER_ACCESS_KEY=... HISTORYCAL_LAST_PERIOD_IN_WEEK=2 forex-report
//!
//! # Different pairs and window
//! forex-report --base-a GBP --base-b CHF --symbol USD --weeks 4
//!
//! # Bigger canvas, config from a file
//! forex-report --width 100 --height 24 --config ./report.toml
//! ```

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use forex_report::chart::{ChartSink, TerminalChart};
use forex_report::client::FixerClient;
use forex_report::config::Config;
use forex_report::currency::Currency;
use forex_report::fixtures::EmbeddedFixtures;
use forex_report::report::ForexReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// forex-report: dual-axis forex rate charts from Fixer.io
#[derive(Parser)]
#[command(name = "forex-report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dual-axis forex rate charts from Fixer.io", long_about = None)]
struct Cli {
    /// Base currency of the first pair (left axis, red)
    #[arg(long, value_name = "CODE", default_value = "USD")]
    base_a: Currency,

    /// Base currency of the second pair (right axis, blue)
    #[arg(long, value_name = "CODE", default_value = "MXN")]
    base_b: Currency,

    /// Quote symbol shared by both pairs
    #[arg(short, long, value_name = "CODE", default_value = "EUR")]
    symbol: Currency,

    /// Trailing window in weeks (overrides the environment)
    #[arg(short, long)]
    weeks: Option<u32>,

    /// Chart width in terminal cells
    #[arg(long, default_value = "64")]
    width: usize,

    /// Chart height in terminal cells
    #[arg(long, default_value = "16")]
    height: usize,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(weeks) = cli.weeks {
        config.period_weeks = weeks;
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "forex-report".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "  {} {}-{} and {}-{}",
            "Pairs:".bold(),
            cli.base_a,
            cli.symbol,
            cli.base_b,
            cli.symbol
        );
        println!("  {} {} weeks", "Window:".bold(), config.period_weeks);
        println!();
    }

    let client = FixerClient::new(config.access_key.clone())
        .context("Failed to create the Fixer.io client")?;
    let report = ForexReport::new(client, EmbeddedFixtures::new(), &config).with_pairs(
        cli.base_a,
        cli.base_b,
        cli.symbol,
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!(
        "Fetching {}-{} and {}-{} rates...",
        cli.base_a, cli.symbol, cli.base_b, cli.symbol
    ));

    let range = report.window();
    let result = report.build(&range).await;
    spinner.finish_and_clear();
    let merged = result.context("Failed to build the report")?;

    let chart = TerminalChart::new(cli.width, cli.height);
    chart.render(&merged)?;

    println!();
    println!(
        "{} {} sessions charted, {} to {}",
        "✓".green().bold(),
        merged.len(),
        range.start,
        range.end
    );

    Ok(())
}
