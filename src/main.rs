use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cardlens::audit::ReportAudit;
use cardlens::cashback::increased_cashback_categories;
use cardlens::clock::{Clock, SystemClock};
use cardlens::config::{default_config_path, ResolvedConfig};
use cardlens::dashboard::{self, build_dashboard};
use cardlens::loader::load_operations;
use cardlens::market::{ApilayerRateSource, FmpPriceSource};
use cardlens::models::Operation;
use cardlens::reports;

#[derive(Parser)]
#[command(name = "cardlens")]
#[command(about = "Spending reports over bank card operation exports")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spending in one category over the last three months
    Category {
        /// Category label, matched exactly
        category: String,

        /// Reference date, dd.mm.yyyy (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mean spend per operation date over the last three months
    Weekday {
        /// Reference date, dd.mm.yyyy (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mean spend split into workdays and weekends
    Workday {
        /// Reference date, dd.mm.yyyy (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Cashback earned per category in one calendar month
    Cashback {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,
    },
    /// Full dashboard payload for one moment
    Dashboard {
        /// Reference moment, "YYYY-MM-DD HH:MM:SS" (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    let clock = SystemClock;

    match cli.command {
        Command::Category { category, date } => {
            let operations = operations(&config);
            let rows = ReportAudit::new(&config.audit_log).run_logged(
                &clock,
                "spending_by_category",
                &format!("category={category:?}, date={date:?}"),
                || reports::spending_by_category(&operations, &category, date.as_deref(), &clock),
            )?;
            print_json(&rows)?;
        }
        Command::Weekday { date } => {
            let operations = operations(&config);
            let rows = ReportAudit::new(&config.audit_log).run_logged(
                &clock,
                "spending_by_weekday",
                &format!("date={date:?}"),
                || reports::spending_by_weekday(&operations, date.as_deref(), &clock),
            )?;
            print_json(&rows)?;
        }
        Command::Workday { date } => {
            let operations = operations(&config);
            let split = ReportAudit::new(&config.audit_log).run_logged(
                &clock,
                "spending_by_workday",
                &format!("date={date:?}"),
                || reports::spending_by_workday(&operations, date.as_deref(), &clock),
            )?;
            print_json(&split)?;
        }
        Command::Cashback { year, month } => {
            let operations = operations(&config);
            let totals = ReportAudit::new(&config.audit_log).run_logged(
                &clock,
                "increased_cashback_categories",
                &format!("year={year}, month={month}"),
                || increased_cashback_categories(&operations, year, month),
            )?;
            print_json(&totals)?;
        }
        Command::Dashboard { date } => {
            let operations = operations(&config);
            let rates = ApilayerRateSource::new(config.require_currency_api_key()?.expose_secret());
            let stocks = FmpPriceSource::new(config.require_stocks_api_key()?.expose_secret());
            let moment = date
                .unwrap_or_else(|| clock.now().format(dashboard::MOMENT_FORMAT).to_string());
            let payload =
                build_dashboard(&operations, &config, &rates, &stocks, &moment).await?;
            print_json(&payload)?;
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("Operations file: {}", config.operations_file.display());
            println!("Audit log: {}", config.audit_log.display());
            println!("Home currency: {}", config.home_currency);
            println!("Currencies: {}", config.currencies.join(", "));
            println!("Stocks: {}", config.stocks.join(", "));
        }
    }

    Ok(())
}

fn operations(config: &ResolvedConfig) -> Vec<Operation> {
    load_operations(&config.operations_file, config.csv_delimiter)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
