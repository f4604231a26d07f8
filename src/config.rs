// src/config.rs
// =============================================================================
// Resolved runtime settings for the two subcommands.
//
// cli.rs describes what the user can type; this file holds what the rest of
// the program actually runs with. Keeping them apart means the crawler can
// be driven from tests without going through clap at all.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::crawl::{DepthPolicy, ResetPolicy};

/// Default number of fetches allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Neighbors are only expanded from items whose depth is below this
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Directory holding one Turtle file per accepted WebID
pub const DEFAULT_CORPUS_DIR: &str = "webids";

/// Where the export subcommand writes the compacted profiles
pub const DEFAULT_EXPORT_PATH: &str = "public/profiles.json";

/// The only representation the crawler asks servers for
pub const PROFILE_ACCEPT: &str = "text/turtle";

/// Settings for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Corpus directory (read for resumption, written on acceptance)
    pub corpus_dir: PathBuf,
    /// Maximum in-flight fetch-and-validate workers
    pub concurrency: usize,
    /// Depth ceiling and reset rule for neighbor expansion
    pub depth_policy: DepthPolicy,
    /// Optional URL of a JSON catalog of known WebIDs
    pub catalog_url: Option<String>,
    /// Per-request timeout handed to the HTTP client
    pub timeout: Duration,
    /// Explicit seeds from the command line
    pub seeds: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            depth_policy: DepthPolicy::new(DEFAULT_MAX_DEPTH, ResetPolicy::AcceptedOnly),
            catalog_url: None,
            timeout: Duration::from_secs(30),
            seeds: Vec::new(),
        }
    }
}

/// Settings for the export (data-compaction) step
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub corpus_dir: PathBuf,
    pub output: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            output: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}
