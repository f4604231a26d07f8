// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: walk the WebID graph and grow the corpus directory
// - export: compact the corpus into a single profiles.json file
//
// Everything here is turned into a config::CrawlConfig or
// config::ExportConfig before any real work starts.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{
    CrawlConfig, ExportConfig, DEFAULT_CONCURRENCY, DEFAULT_CORPUS_DIR, DEFAULT_EXPORT_PATH,
    DEFAULT_MAX_DEPTH,
};
use crate::crawl::{DepthPolicy, ResetPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "webid-crawler",
    version = "0.1.0",
    about = "Crawl the Solid WebID social graph and keep a corpus of valid profiles",
    long_about = "webid-crawler follows foaf:knows links between WebID profile documents, \
                  keeps every profile that declares a solid:oidcIssuer, and stores it in a \
                  corpus directory that later runs resume from."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl WebIDs, starting from the corpus, an optional catalog and SEEDS
    ///
    /// Example: webid-crawler crawl https://alice.example/profile/card#me
    Crawl {
        /// Extra WebIDs to start from (positional, zero or more)
        seeds: Vec<String>,

        /// Directory of accepted profiles, one .ttl file per WebID
        #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
        corpus_dir: PathBuf,

        /// Maximum number of profile fetches in flight at once
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Stop expanding neighbors once an item reaches this depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: u32,

        /// When neighbors restart at depth 0
        #[arg(long, value_enum, default_value_t = ResetPolicy::AcceptedOnly)]
        depth_reset: ResetPolicy,

        /// URL of a JSON catalog of known WebIDs to seed from
        #[arg(long)]
        catalog: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compact the corpus into a JSON-LD shaped profiles file
    ///
    /// Example: webid-crawler export --output public/profiles.json
    Export {
        /// Directory of accepted profiles
        #[arg(long, default_value = DEFAULT_CORPUS_DIR)]
        corpus_dir: PathBuf,

        /// Output file
        #[arg(long, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,
    },
}

// Builds a CrawlConfig from the parsed `crawl` arguments
pub fn crawl_config(
    seeds: Vec<String>,
    corpus_dir: PathBuf,
    concurrency: usize,
    max_depth: u32,
    depth_reset: ResetPolicy,
    catalog: Option<String>,
    timeout_secs: u64,
) -> anyhow::Result<CrawlConfig> {
    if concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }

    Ok(CrawlConfig {
        corpus_dir,
        concurrency,
        depth_policy: DepthPolicy::new(max_depth, depth_reset),
        catalog_url: catalog,
        timeout: Duration::from_secs(timeout_secs),
        seeds,
    })
}

pub fn export_config(corpus_dir: PathBuf, output: PathBuf) -> ExportConfig {
    ExportConfig { corpus_dir, output }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl_defaults() {
        let cli = Cli::parse_from(["webid-crawler", "crawl", "https://a.example/profile#me"]);
        match cli.command {
            Commands::Crawl { seeds, concurrency, max_depth, depth_reset, json, .. } => {
                assert_eq!(seeds, vec!["https://a.example/profile#me".to_string()]);
                assert_eq!(concurrency, 100);
                assert_eq!(max_depth, 3);
                assert_eq!(depth_reset, ResetPolicy::AcceptedOnly);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_depth_reset_variant() {
        let cli = Cli::parse_from(["webid-crawler", "crawl", "--depth-reset", "always"]);
        match cli.command {
            Commands::Crawl { seeds, depth_reset, .. } => {
                assert!(seeds.is_empty());
                assert_eq!(depth_reset, ResetPolicy::Always);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = crawl_config(
            vec![],
            PathBuf::from("webids"),
            0,
            3,
            ResetPolicy::AcceptedOnly,
            None,
            30,
        );
        assert!(result.is_err());
    }
}
