//! docs-to-skill main entry point
//!
//! This is the command-line interface for the documentation-to-skill generator.

use chrono::Utc;
use clap::Parser;
use docs_to_skill::config::{load_config_with_hash, SkillConfig};
use docs_to_skill::crawler::{preview, Coordinator};
use docs_to_skill::output::{generate, print_report, write_artifacts, CrawlReport, OutputLayout};
use docs_to_skill::state::CrawlState;
use docs_to_skill::storage::CheckpointStore;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// docs-to-skill: turns a documentation site into a skill reference set
///
/// Crawls a documentation website breadth-first, extracts titles, content,
/// headings and code examples, groups pages by keyword category, and writes
/// reference documents, an index, a skill prompt and an instructions file.
#[derive(Parser, Debug)]
#[command(name = "docs-to-skill")]
#[command(version = "1.0.0")]
#[command(about = "Turn a documentation site into a skill reference set", long_about = None)]
struct Cli {
    /// Path to the skill configuration file (TOML, or JSON with a .json extension)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Fetch only the start page and show what would be crawled
    #[arg(long, conflicts_with_all = ["build_only", "resume"])]
    dry_run: bool,

    /// Regenerate documents from the page cache without crawling
    #[arg(long, conflicts_with_all = ["dry_run", "resume"])]
    build_only: bool,

    /// Continue from the page cache of an earlier run
    #[arg(long, conflicts_with_all = ["dry_run", "build_only"])]
    resume: bool,

    /// Workspace directory generated files are written under
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let layout = OutputLayout::new(&cli.root, &config.name);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config).await?;
    } else if cli.build_only {
        handle_build_only(&config, &layout)?;
    } else {
        handle_crawl(config, config_hash, &layout, cli.resume).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_to_skill=info,warn"),
            1 => EnvFilter::new("docs_to_skill=debug,info"),
            2 => EnvFilter::new("docs_to_skill=trace,debug"),
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

/// Handles the --dry-run mode: previews the start page's links
async fn handle_dry_run(config: &SkillConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== docs-to-skill Dry Run ===\n");

    println!("Skill Configuration:");
    println!("  Name: {}", config.name);
    println!("  Base URL: {}", config.base_url);
    println!("  Start URL: {}", config.start_url());
    println!("  Max pages: {}", config.max_pages);
    println!("  Rate limit: {}s", config.rate_limit);
    println!("  Categories: {}", config.categories.len());

    let report = match preview(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Dry run failed: {}", e);
            return Err(e.into());
        }
    };

    println!("\nPreview Results:");
    println!("  Found ~{} pages", report.estimated_pages());
    println!("  Will crawl up to: {} pages", report.max_pages);
    println!("  Rate limit: {}s between requests", report.rate_limit);
    println!("  Estimated time: {:.1} minutes", report.estimated_minutes());

    println!("\nSample URLs (first {}):", report.sample.len());
    for url in &report.sample {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Ready to crawl {} links from the start page", report.links_found);

    Ok(())
}

/// Handles the --build-only mode: regenerates documents from the page cache
fn handle_build_only(
    config: &SkillConfig,
    layout: &OutputLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CheckpointStore::new(layout.cache_path());
    tracing::info!("Loading page cache from {}", store.path().display());

    let state = store.load_required()?.into_state();
    tracing::info!("Loaded {} cached pages", state.page_count());

    write_skill(config, &state, layout)
}

/// Handles the main crawl operation, fresh or resumed
async fn handle_crawl(
    config: SkillConfig,
    config_hash: String,
    layout: &OutputLayout,
    resume: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = CheckpointStore::new(layout.cache_path());
    let mut coordinator = Coordinator::new(config.clone())?.with_checkpoint(store, config_hash);

    if resume {
        tracing::info!("Resuming crawl from {}", layout.cache_path().display());
        coordinator = coordinator.resume()?;
    } else {
        tracing::info!("Starting fresh crawl of {}", config.start_url());
    }

    // Ctrl-C stops the crawl at the next step; partial results are still written
    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let started = Instant::now();
    let state = coordinator.run().await;
    print_report(&CrawlReport::from_state(&state, started.elapsed()));

    write_skill(&config, &state, layout)
}

/// Generates and writes every document for the crawled pages
fn write_skill(
    config: &SkillConfig,
    state: &CrawlState,
    layout: &OutputLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Generating skill files...");
    let artifacts = generate(state.pages(), config, Utc::now());
    let written = write_artifacts(&artifacts, layout)?;

    for path in &written {
        println!("✓ {}", path.display());
    }
    println!(
        "\n✓ Skill generated from {} pages in {} categories",
        state.page_count(),
        artifacts.references.len()
    );

    Ok(())
}
