//! Chronomood CLI
//!
//! Scores tweets and aggregates a scored dataset by hour of day.
//!
//! # Commands
//!
//! - `score <TEXT>`: sentiment breakdown of one text
//! - `aggregate <FILE>`: hourly means and hour × label counts
//! - `terms <FILE> --label L`: most frequent terms for a label
//! - `days <FILE>`: weekdays present in the dataset
//!
//! Output is pretty JSON on stdout; logs go to stderr.

use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chronomood::{AppConfig, Dataset, MoodLabel, RecordFilter, SentimentAnalyzer};

#[derive(Parser)]
#[command(name = "chronomood")]
#[command(version)]
#[command(about = "Tweet mood scoring and hour-of-day aggregation")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (overrides $CHRONOMOOD_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single text
    Score {
        text: String,
    },
    /// Hourly aggregates for a dataset (JSON array or JSON lines)
    Aggregate {
        file: PathBuf,
        #[arg(long, value_parser = parse_weekday)]
        day: Option<Weekday>,
        #[arg(long)]
        hour: Option<u32>,
    },
    /// Most frequent terms among records with a given label
    Terms {
        file: PathBuf,
        #[arg(long)]
        label: MoodLabel,
        #[arg(long, value_parser = parse_weekday)]
        day: Option<Weekday>,
        #[arg(long)]
        hour: Option<u32>,
        /// Defaults to `[terms] limit` from config
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Distinct weekdays present, Monday first
    Days {
        file: PathBuf,
    },
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("unknown weekday `{s}` (try mon..sun or monday..sunday)"))
}

/// `RUST_LOG` wins; otherwise `-v` levels, otherwise the config filter.
fn init_tracing(verbose: u8, json: bool, config_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new(config_filter),
        1 => EnvFilter::new("chronomood=debug,info"),
        _ => EnvFilter::new("trace"),
    });

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialised: {e}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn filter_from(day: Option<Weekday>, hour: Option<u32>) -> RecordFilter {
    RecordFilter { day, hour }
}

fn main() -> Result<()> {
    // Load .env in local/dev; absent file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(p) => AppConfig::load_from(p)?,
        None => AppConfig::load_default()?,
    };
    init_tracing(cli.verbose, cli.log_json, &cfg.log.filter);
    debug!(target: "chronomood", ?cfg, "config resolved");

    // Shared by `score` and by dataset rows that arrive without a score.
    let analyzer = SentimentAnalyzer::with_lexicon(cfg.build_lexicon()?);

    match cli.command {
        Commands::Score { text } => print_json(&analyzer.analyze(&text)),
        Commands::Aggregate { file, day, hour } => {
            let ds = Dataset::load_with(&file, &analyzer)?;
            let aggregates = ds
                .aggregate(Some(&filter_from(day, hour)))
                .context("aggregating dataset")?;
            print_json(&aggregates)
        }
        Commands::Terms {
            file,
            label,
            day,
            hour,
            limit,
        } => {
            let ds = Dataset::load_with(&file, &analyzer)?;
            let limit = limit.unwrap_or(cfg.terms.limit);
            if limit == 0 {
                return Err(anyhow!("--limit must be at least 1"));
            }
            let terms = ds
                .top_terms(&filter_from(day, hour), label, limit, &cfg.terms.extra_stopwords)
                .context("counting terms")?;
            print_json(&terms)
        }
        Commands::Days { file } => {
            let ds = Dataset::load_with(&file, &analyzer)?;
            let days: Vec<String> = ds.days().iter().map(|d| d.to_string()).collect();
            print_json(&days)
        }
    }
}
