// src/crawl/mod.rs
// =============================================================================
// This module handles crawling the WebID graph.
//
// Features:
// - Breadth-first crawling over foaf:knows links
// - Each WebID is crawled at most once per run
// - Depth budget that resets at every accepted profile
// - A fixed cap on concurrent fetches
// - Resumes from whatever the corpus already holds
//
// Submodules:
// - queue: the frontier and visited set
// - policy: depth ceiling and reset rule
// - worker: fetch, parse, validate and save one WebID
// - scheduler: runs workers up to the concurrency cap
// - seeds: builds the initial frontier
// =============================================================================

mod policy;
mod queue;
mod scheduler;
mod seeds;
mod worker;

#[cfg(test)]
mod testing;

pub use policy::{DepthPolicy, ResetPolicy};
pub use scheduler::{CrawlSummary, Scheduler};
pub use seeds::assemble_seeds;
