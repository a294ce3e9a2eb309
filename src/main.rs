//! Forum-Harvest main entry point
//!
//! This is the command-line interface for the Forum-Harvest topic archiver.

use clap::Parser;
use forum_harvest::config::load_config;
use forum_harvest::output::ReportWriter;
use forum_harvest::scrape::ScrapeOrchestrator;
use forum_harvest::session;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Forum-Harvest: an authenticated forum topic archiver
///
/// Forum-Harvest logs into an SSO-protected forum, walks a range of topic
/// ids, classifies each topic's existence state, and writes per-topic and
/// summary XML reports.
#[derive(Parser, Debug)]
#[command(name = "forum-harvest")]
#[command(version = "0.1.0")]
#[command(about = "An authenticated forum topic archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // A failed or skipped login is not fatal; public topics stay readable
    let session = session::login(&config).await?;
    if !session.authenticated {
        tracing::warn!("Running without an authenticated session");
    }

    let mut orchestrator = ScrapeOrchestrator::new(&config, session)?;
    let (outcomes, summary) = orchestrator.run().await?;

    let writer = ReportWriter::new(&config.output);
    let written = writer.write_reports(&outcomes, &summary)?;

    println!("Scrape finished in {:.1}s", summary.elapsed.as_secs_f64());
    println!(
        "  topics with content: {}, empty: {}, not found: {}, errors: {}",
        summary.has_content, summary.empty, summary.not_found, summary.fetch_error
    );
    println!("  {} report file(s) in {}", written.len(), writer.directory().display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("forum_harvest=info,warn"),
            1 => EnvFilter::new("forum_harvest=debug,info"),
            2 => EnvFilter::new("forum_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the scrape plan
fn handle_dry_run(config: &forum_harvest::config::Config) {
    println!("=== Forum-Harvest Dry Run ===\n");

    println!("Forum:");
    println!("  Base URL: {}", config.forum.base_url);
    println!("  User agent: {}", config.forum.user_agent);

    println!("\nSession:");
    if config.credentials.username.is_empty() {
        println!("  Anonymous (no credentials configured)");
    } else {
        println!("  Will log in as: {}", config.credentials.username);
    }

    let id_count = (config.scrape.end_id - config.scrape.start_id) / config.scrape.step + 1;
    println!("\nScrape plan:");
    println!(
        "  Id range: {}..{} step {} ({} ids)",
        config.scrape.start_id, config.scrape.end_id, config.scrape.step, id_count
    );
    if let Some(priority) = config.scrape.priority_id {
        println!("  Priority id: {} (fetched first)", priority);
    }
    println!("  Delay between requests: {}ms", config.scrape.delay_ms);
    println!(
        "  Page cap per topic: {}",
        config.scrape.max_pages_per_topic
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Per-topic files: {}", config.output.separate_files);

    println!("\n✓ Configuration is valid");
}
