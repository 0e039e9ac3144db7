//! Sumi-Sift main entry point
//!
//! This is the command-line interface for the Sumi-Sift site metadata sifter.

use anyhow::{bail, Context};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use sumi_sift::config::{load_config_with_hash, validate, Config};
use sumi_sift::crawler::Coordinator;
use sumi_sift::output::{print_statistics, report_path, write_report_file};
use tracing_subscriber::EnvFilter;

/// Sumi-Sift: a single-site metadata sifter
///
/// Sumi-Sift crawls every same-domain page reachable from a seed URL and
/// writes titles, headings, meta descriptions and status codes into one
/// delimited report.
#[derive(Parser, Debug)]
#[command(name = "sumi-sift")]
#[command(version = "1.0.0")]
#[command(about = "A single-site metadata sifter", long_about = None)]
struct Cli {
    /// Seed URL (prompted for when omitted)
    #[arg(value_name = "URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker pool size for the first pass
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Worker pool size for the retry pass
    #[arg(long, value_name = "N")]
    retry_workers: Option<usize>,

    /// Directory the report is written into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate input and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let seed = match &cli.seed {
        Some(seed) => seed.clone(),
        None => prompt_seed().context("Failed to read seed URL")?,
    };

    let coordinator = Coordinator::new(config, &seed)
        .with_context(|| format!("Cannot crawl '{}'", seed.trim()))?;

    let output = &coordinator.config().output;
    let path = report_path(coordinator.seed(), output);

    if cli.dry_run {
        handle_dry_run(&coordinator, &path);
        return Ok(());
    }

    std::fs::create_dir_all(&output.directory)
        .with_context(|| format!("Failed to create output directory {}", output.directory))?;

    let outcome = coordinator.run().await;

    // The delimiter is validated as ASCII, so it fits in one byte
    write_report_file(&outcome.report, &path, output.delimiter as u8)
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    if !cli.quiet {
        print_statistics(&outcome.stats, Some(&path));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sift=info,warn"),
            1 => EnvFilter::new("sumi_sift=debug,info"),
            2 => EnvFilter::new("sumi_sift=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(retry_workers) = cli.retry_workers {
        config.crawler.retry_workers = retry_workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}

/// Asks for the seed URL on stdin
fn prompt_seed() -> anyhow::Result<String> {
    print!("Enter the URL: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("no URL given on stdin");
    }

    Ok(line)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(coordinator: &Coordinator, path: &Path) {
    let config = coordinator.config();

    println!("=== Sumi-Sift Dry Run ===\n");

    println!("Seed: {}", coordinator.seed());
    println!("Domain: {}", coordinator.domain());

    println!("\nCrawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Retry workers: {}", config.crawler.retry_workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);
    println!("  Heading levels: {:?}", config.crawler.heading_levels);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Report: {}", path.display());
    println!("  Delimiter: {:?}", config.output.delimiter);

    println!("\n✓ Configuration is valid");
}
