// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Dispatch to the crawl or export subcommand
// 4. Exit with proper code (0 = finished, 2 = could not start)
//
// A crawl never fails because of what it finds on the web. Unreachable or
// broken profiles are logged and skipped. Only startup problems, like a
// corpus directory we cannot read, end the program with an error.
// =============================================================================

mod cli;
mod config;
mod corpus;
mod crawl;
mod error;
mod export;
mod fetch;
mod profile;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, LogFormat};
use config::{CrawlConfig, ExportConfig};
use corpus::DirCorpus;
use crawl::{assemble_seeds, CrawlSummary, Scheduler};
use fetch::{fetch_catalog, HttpFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Crawl {
            seeds,
            corpus_dir,
            concurrency,
            max_depth,
            depth_reset,
            catalog,
            timeout_secs,
            json,
        } => {
            let config = cli::crawl_config(
                seeds,
                corpus_dir,
                concurrency,
                max_depth,
                depth_reset,
                catalog,
                timeout_secs,
            )?;
            let summary = handle_crawl(config).await?;
            print_summary(&summary, json)
        }
        Commands::Export { corpus_dir, output } => {
            handle_export(cli::export_config(corpus_dir, output)).await
        }
    }
}

// RUST_LOG wins; otherwise info (or debug with --verbose) for this crate
fn init_logging(verbose: bool, format: LogFormat) {
    let default_filter = if verbose {
        "webid_crawler=debug,warn"
    } else {
        "webid_crawler=info,warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(config: CrawlConfig) -> Result<CrawlSummary> {
    let corpus = DirCorpus::open(&config.corpus_dir)
        .await
        .with_context(|| format!("Could not open corpus directory {}", config.corpus_dir.display()))?;
    let fetcher = HttpFetcher::new(config.timeout).context("Could not build HTTP client")?;

    let catalog = match &config.catalog_url {
        Some(url) => fetch_catalog(fetcher.client(), url).await,
        None => Vec::new(),
    };

    let seeds = assemble_seeds(&corpus, catalog, config.seeds).await?;

    if seeds.is_empty() {
        tracing::warn!("No seeds: the corpus is empty and no catalog or CLI WebIDs were given");
    }
    if seeds.from_cli > 0 {
        tracing::info!("Added {} seed(s) from CLI arguments.", seeds.from_cli);
    }
    tracing::info!(
        corpus = seeds.from_corpus,
        catalog = seeds.from_catalog,
        cli = seeds.from_cli,
        concurrency = config.concurrency,
        max_depth = config.depth_policy.max_depth(),
        depth_reset = ?config.depth_policy.reset(),
        "Crawling started with {} initial seed(s). Press Ctrl+C to stop.",
        seeds.len()
    );

    let scheduler = Scheduler::new(
        Arc::new(fetcher),
        Arc::new(corpus),
        config.depth_policy,
        config.concurrency,
    );

    Ok(scheduler.run(seeds.items).await)
}

// Handles the 'export' subcommand
async fn handle_export(config: ExportConfig) -> Result<()> {
    let corpus = DirCorpus::open(&config.corpus_dir)
        .await
        .with_context(|| format!("Could not open corpus directory {}", config.corpus_dir.display()))?;

    let report = export::export_corpus(&corpus, &config.output).await?;

    println!();
    println!("Data preparation complete!");
    println!("  - Successfully processed: {} profiles", report.exported);
    println!("  - Without exportable data: {}", report.empty);
    println!("  - Errors: {}", report.errors);
    println!("  - Output written to: {}", report.output.display());
    Ok(())
}

fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("Crawled {} WebIDs.", summary.accepted);
        println!(
            "   visited: {}, ignored: {}, failed: {}, not saved: {}",
            summary.visited, summary.ignored, summary.failed, summary.persist_failures
        );
    }
    Ok(())
}
