// src/crawl/seeds.rs
// =============================================================================
// Builds the initial frontier from three sources, in this order:
// 1. Every WebID already in the corpus (so a re-run refreshes the corpus
//    instead of starting over)
// 2. The optional remote catalog
// 3. WebIDs given on the command line
//
// All seeds start at depth 0. If a WebID shows up in more than one source,
// the first source keeps it and later copies are dropped.
//
// Only a corpus that cannot be listed is fatal. A bad catalog or a bad
// command-line seed just contributes nothing.
// =============================================================================

use std::collections::HashSet;

use anyhow::{Context, Result};
use url::Url;

use super::queue::FrontierItem;
use crate::corpus::CorpusStore;

/// The assembled seeds and where they came from
#[derive(Debug, Default)]
pub struct SeedSet {
    pub items: Vec<FrontierItem>,
    pub from_corpus: usize,
    pub from_catalog: usize,
    pub from_cli: usize,
}

impl SeedSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// Merges the three seed sources
//
// Parameters:
//   corpus: the corpus to resume from
//   catalog: identifiers from the remote catalog (already fetched, may be empty)
//   cli_seeds: identifiers from the command line
pub async fn assemble_seeds(
    corpus: &dyn CorpusStore,
    catalog: Vec<String>,
    cli_seeds: Vec<String>,
) -> Result<SeedSet> {
    let existing = corpus
        .list()
        .await
        .context("Could not list the corpus directory")?;

    let mut seen = HashSet::new();
    let mut seeds = SeedSet::default();

    for webid in existing {
        if seen.insert(webid.clone()) {
            seeds.items.push(FrontierItem::seed(webid));
            seeds.from_corpus += 1;
        }
    }

    for webid in catalog.into_iter().filter(|w| is_crawlable(w, "catalog")) {
        if seen.insert(webid.clone()) {
            seeds.items.push(FrontierItem::seed(webid));
            seeds.from_catalog += 1;
        }
    }

    for webid in cli_seeds.into_iter().filter(|w| is_crawlable(w, "command line")) {
        if seen.insert(webid.clone()) {
            seeds.items.push(FrontierItem::seed(webid));
            seeds.from_cli += 1;
        }
    }

    Ok(seeds)
}

// Only absolute http(s) URLs can be fetched
fn is_crawlable(webid: &str, source: &str) -> bool {
    match Url::parse(webid) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => true,
        Ok(_) => {
            tracing::warn!(webid, source, "Skipping seed that is not an http(s) URL");
            false
        }
        Err(e) => {
            tracing::warn!(webid, source, error = %e, "Skipping seed that is not a valid URL");
            false
        }
    }
}
