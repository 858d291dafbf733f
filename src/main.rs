//! Indicadores main entry point
//!
//! Command-line interface for scraping and querying the published indicators.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use indicadores::config::{load_config_with_hash, Config};
use indicadores::indices::IndexKind;
use indicadores::store::Granularity;
use indicadores::{Category, DailySeries, DataStore, IngestReport, Indicators, Ingestor, Lookup};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Indicadores: Argentine economic indicators and river heights
///
/// Scrapes UVA, UVI and river heights into dated JSON files and answers
/// current, history and range queries over every published category.
#[derive(Parser, Debug)]
#[command(name = "indicadores")]
#[command(version)]
#[command(about = "Argentine indicators scraper and query tool", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one ingestion and publish its files
    Scrape {
        #[arg(value_enum)]
        target: ScrapeTarget,
    },

    #[command(flatten)]
    Query(QueryCommand),

    /// Validate the configuration and print the effective values
    CheckConfig,
}

#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// Print the current snapshot of a category
    Current { category: Category },

    /// Print the full history of a category
    History { category: Category },

    /// Print history records between two inclusive bounds
    ///
    /// Bounds are YYYY-MM-DD for icl, uva and uvi, and YYYY-MM for ipc.
    Range {
        category: Category,
        from: String,
        to: String,
    },

    /// Print one river of the latest heights report
    River { name: String },

    /// Print fuel prices, optionally filtered
    Fuels {
        #[arg(long)]
        province: Option<String>,

        #[arg(long, conflicts_with = "province")]
        company: Option<String>,
    },

    /// Print the average price of a fuel in a province
    FuelAverage { province: String, fuel: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScrapeTarget {
    Rios,
    Uva,
    Uvi,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    match cli.command {
        Command::Scrape { target } => handle_scrape(&config, target).await,
        Command::CheckConfig => handle_check_config(&config),
        Command::Query(query) => handle_query(&config, query),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("indicadores=info,warn"),
            1 => EnvFilter::new("indicadores=debug,info"),
            2 => EnvFilter::new("indicadores=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `scrape`: one fetch, one publish
async fn handle_scrape(config: &Config, target: ScrapeTarget) -> anyhow::Result<ExitCode> {
    let ingestor = Ingestor::from_config(config).context("building HTTP client")?;

    let result = match target {
        ScrapeTarget::Rios => ingestor.rivers().await,
        ScrapeTarget::Uva => ingestor.index(IndexKind::Uva).await,
        ScrapeTarget::Uvi => ingestor.index(IndexKind::Uvi).await,
    };

    match result {
        Ok(report) => {
            print_ingest_report(&report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Scrape of {:?} failed: {}", target, e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_ingest_report(report: &IngestReport) {
    match &report.history_file {
        Some(path) => println!("✓ {}: wrote {}", report.category, path.display()),
        None => println!("✓ {}: reading already in history", report.category),
    }
    println!("  latest: {}", report.latest_file.display());
    println!("  records: {}", report.records);
}

/// Handles `check-config`
fn handle_check_config(config: &Config) -> anyhow::Result<ExitCode> {
    let rendered = toml::to_string_pretty(config).context("rendering configuration")?;
    println!("{}", rendered);
    println!("✓ Configuration is valid");
    Ok(ExitCode::SUCCESS)
}

/// Handles every read-only command
fn handle_query(config: &Config, command: QueryCommand) -> anyhow::Result<ExitCode> {
    let indicators = Indicators::new(DataStore::new(&config.storage.data_dir));

    match command {
        QueryCommand::Current { category } => match category.granularity() {
            Granularity::Daily => emit(indicators.current(daily_series(category)?)?),
            Granularity::Monthly => emit(indicators.ipc_current()?),
            Granularity::Snapshot => match category {
                Category::Rios => emit(indicators.rivers()?),
                _ => emit(indicators.fuels()?),
            },
        },
        QueryCommand::History { category } => match category.granularity() {
            Granularity::Daily => emit(indicators.history(daily_series(category)?)),
            Granularity::Monthly => emit(indicators.ipc_history()),
            Granularity::Snapshot => bail!("category '{}' has no history series", category),
        },
        QueryCommand::Range { category, from, to } => match category.granularity() {
            Granularity::Daily => emit(indicators.range(daily_series(category)?, &from, &to)),
            Granularity::Monthly => emit(indicators.ipc_range(&from, &to)),
            Granularity::Snapshot => bail!("category '{}' has no history series", category),
        },
        QueryCommand::River { name } => emit(indicators.river(&name)?),
        QueryCommand::Fuels { province, company } => match (province, company) {
            (Some(province), _) => emit(indicators.fuels_by_province(&province)?),
            (None, Some(company)) => emit(indicators.fuels_by_company(&company)?),
            (None, None) => emit(indicators.fuels()?),
        },
        QueryCommand::FuelAverage { province, fuel } => {
            emit(indicators.average_fuel_price(&province, &fuel)?)
        }
    }
}

fn daily_series(category: Category) -> anyhow::Result<DailySeries> {
    DailySeries::from_category(category)
        .with_context(|| format!("category '{}' is not a daily series", category))
}

/// Prints a found result as JSON; "no data" exits non-zero
fn emit<T: Serialize>(lookup: Lookup<T>) -> anyhow::Result<ExitCode> {
    match lookup {
        Lookup::Found(value) => {
            let json = serde_json::to_string_pretty(&value).context("serializing result")?;
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Lookup::NoData => {
            eprintln!("No data");
            Ok(ExitCode::FAILURE)
        }
    }
}
