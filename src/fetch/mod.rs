// src/fetch/mod.rs
// =============================================================================
// This module talks to the network.
//
// Submodules:
// - http: the Fetcher trait and its reqwest implementation
// - catalog: optional remote list of already-known WebIDs
//
// The crawler only ever sees the Fetcher trait, so tests can swap in a
// scripted in-memory graph instead of real servers.
// =============================================================================

mod catalog;
mod http;

pub use catalog::fetch_catalog;
pub use http::{Fetcher, HttpFetcher};

#[cfg(test)]
pub use http::FetchedDocument;
