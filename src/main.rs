//! Command-line entry point for the byggesak scraper

use anyhow::Context;
use byggesak_scraper::config::{load_targets_with_hash, Registry};
use byggesak_scraper::Scraper;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrapes building-permit cases from municipal portals
///
/// Runs one search against the chosen portal, then fetches every listed
/// case in sequence, and writes the normalized records as JSON.
#[derive(Parser, Debug)]
#[command(name = "byggesak-scraper")]
#[command(version)]
#[command(about = "Scrapes building-permit cases from municipal portals", long_about = None)]
struct Cli {
    /// Municipality target to scrape (e.g. "oslo")
    #[arg(value_name = "MUNICIPALITY")]
    municipality: String,

    /// Free-text search query passed to the portal
    #[arg(long)]
    query: Option<String>,

    /// Maximum number of cases to scrape
    #[arg(long, value_name = "N")]
    max_cases: Option<usize>,

    /// TOML targets file (replaces the built-in registry)
    #[arg(long, value_name = "FILE")]
    targets: Option<PathBuf>,

    /// Output JSON file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let registry = match &cli.targets {
        Some(path) => {
            let (registry, hash) = load_targets_with_hash(path)
                .with_context(|| format!("failed to load targets from {}", path.display()))?;
            tracing::info!("Loaded targets from {} (hash: {})", path.display(), hash);
            registry
        }
        None => Registry::builtin(),
    };

    let mut scraper = Scraper::with_registry(&cli.municipality, &registry)
        .context("failed to initialize scraper")?;

    let params: Vec<(String, String)> = cli
        .query
        .iter()
        .map(|q| ("query".to_string(), q.clone()))
        .collect();

    let report = scraper.scrape_cases(&params, cli.max_cases).await?;

    if report.failed() > 0 {
        tracing::warn!(
            "{} of {} cases could not be scraped",
            report.failed(),
            report.attempted
        );
    }

    let json = serde_json::to_string_pretty(&report.cases)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }

    tracing::info!("Scraping completed: {} cases", report.cases.len());
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("byggesak_scraper=info,warn"),
            1 => EnvFilter::new("byggesak_scraper=debug,info"),
            2 => EnvFilter::new("byggesak_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
