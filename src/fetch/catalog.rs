// src/fetch/catalog.rs
// =============================================================================
// Fetches an optional remote catalog of known WebIDs.
//
// Accepted shapes:
//   ["https://a.example/card#me", "https://b.example/card#me"]
//   { "webids": ["https://a.example/card#me", ...], "count": 2, ... }
//
// The catalog is best-effort. Any failure (network, status, bad JSON) is
// logged and turns into an empty list so seeding from the corpus and the
// command line still goes ahead.
// =============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

// Either a bare array or an object with a `webids` field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<String>),
    Object { webids: Vec<String> },
}

impl CatalogDocument {
    fn into_webids(self) -> Vec<String> {
        match self {
            CatalogDocument::List(webids) => webids,
            CatalogDocument::Object { webids } => webids,
        }
    }
}

/// Returns the catalog's identifiers, or an empty list on any failure
pub async fn fetch_catalog(client: &Client, url: &str) -> Vec<String> {
    match try_fetch_catalog(client, url).await {
        Ok(webids) => {
            tracing::info!(url, count = webids.len(), "Loaded WebID catalog");
            webids
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Could not load WebID catalog, continuing without it");
            Vec::new()
        }
    }
}

async fn try_fetch_catalog(client: &Client, url: &str) -> Result<Vec<String>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch {}: HTTP {}", url, response.status()));
    }

    let document: CatalogDocument = response.json().await?;
    Ok(document.into_webids())
}
