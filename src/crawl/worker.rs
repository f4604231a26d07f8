// src/crawl/worker.rs
// =============================================================================
// Crawls a single WebID.
//
// Steps:
// 1. Fetch the document as Turtle
// 2. Parse it with the final (post-redirect) URL as base
// 3. Accept it if it names at least one solid:oidcIssuer
// 4. If accepted, write the raw body to the corpus
// 5. If the item is shallow enough, hand back its foaf:knows neighbors
//    with their depths already worked out
//
// Nothing in here can fail the crawl. Every problem ends up as a Verdict
// for this one item. The worker never touches the frontier either; the
// scheduler decides which neighbors are actually new.
// =============================================================================

use super::policy::DepthPolicy;
use super::queue::FrontierItem;
use crate::corpus::CorpusStore;
use crate::error::ParseError;
use crate::fetch::Fetcher;
use crate::profile::{parse_profile, ProfileDocument};

/// What happened to one crawled WebID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Has an OIDC issuer. `persisted` is false if the corpus write failed
    Accepted { persisted: bool },
    /// Parsed fine but has no OIDC issuer
    Ignored,
    /// Transport error or non-2xx status
    FetchFailed { reason: String },
    /// Body was not UTF-8 or not valid Turtle
    ParseFailed { reason: String },
}

/// The result of crawling one FrontierItem
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    pub item: FrontierItem,
    pub verdict: Verdict,
    /// Neighbor candidates; the scheduler drops the ones already visited
    pub neighbors: Vec<FrontierItem>,
}

impl WorkerOutcome {
    fn dead_end(item: FrontierItem, verdict: Verdict) -> Self {
        Self {
            item,
            verdict,
            neighbors: Vec::new(),
        }
    }
}

// Turtle is always UTF-8; the bytes themselves are stored untouched
fn parse_body(body: &[u8], base_iri: &str, subject: &str) -> Result<ProfileDocument, ParseError> {
    let text = std::str::from_utf8(body)?;
    parse_profile(text, base_iri, subject)
}

// Crawls one WebID
//
// Parameters:
//   item: the WebID and its depth
//   fetcher: the transport
//   corpus: where accepted profiles go
//   policy: depth ceiling and reset rule
pub async fn process_item(
    item: FrontierItem,
    fetcher: &dyn Fetcher,
    corpus: &dyn CorpusStore,
    policy: DepthPolicy,
) -> WorkerOutcome {
    let document = match fetcher.fetch(&item.identifier).await {
        Ok(document) if document.is_success() => document,
        Ok(document) => {
            tracing::debug!(webid = %item.identifier, status = document.status, "Fetch failed");
            let reason = format!("HTTP {}", document.status);
            return WorkerOutcome::dead_end(item, Verdict::FetchFailed { reason });
        }
        Err(e) => {
            tracing::debug!(webid = %item.identifier, error = %e, "Fetch failed");
            return WorkerOutcome::dead_end(item, Verdict::FetchFailed { reason: e.to_string() });
        }
    };

    let profile = match parse_body(&document.body, &document.final_url, &item.identifier) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::debug!(
                webid = %item.identifier,
                content_type = ?document.content_type,
                error = %e,
                "Parse failed"
            );
            return WorkerOutcome::dead_end(item, Verdict::ParseFailed { reason: e.to_string() });
        }
    };

    let accepted = profile.is_accepted();
    let verdict = if accepted {
        tracing::info!(webid = %item.identifier, depth = item.depth, "Discovered WebID");
        let persisted = match corpus.write(&item.identifier, &document.body).await {
            Ok(()) => true,
            Err(e) => {
                // Still counts as accepted; its neighbors are explored below
                tracing::warn!(webid = %item.identifier, error = %e, "Could not save WebID to corpus");
                false
            }
        };
        Verdict::Accepted { persisted }
    } else {
        tracing::info!(webid = %item.identifier, depth = item.depth, "Ignored (no OIDC issuer)");
        Verdict::Ignored
    };

    let mut neighbors = Vec::new();
    if policy.expands(item.depth) {
        let depth = policy.neighbor_depth(item.depth, accepted);
        neighbors.extend(profile.neighbors().map(|webid| FrontierItem::new(webid.as_str(), depth)));
    }

    WorkerOutcome {
        item,
        verdict,
        neighbors,
    }
}
