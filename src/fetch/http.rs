// src/fetch/http.rs
// =============================================================================
// This module fetches WebID profile documents over HTTP.
//
// Key functionality:
// - Always asks for Turtle (Accept: text/turtle)
// - Follows a few redirects and remembers where we ended up, because the
//   final URL is the base for resolving relative references
// - Hands back the status code even for non-2xx answers; deciding what a
//   4xx means is the worker's job, not the transport's
//
// Rust concepts:
// - Traits: Fetcher describes "something that can fetch a URL"
// - async-trait: lets a trait have async methods and still be used as
//   Arc<dyn Fetcher> across tokio tasks
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::config::PROFILE_ACCEPT;
use crate::error::FetchError;

/// A response from the transport
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// HTTP status code
    pub status: u16,
    /// URL after redirects (base IRI for parsing)
    pub final_url: String,
    /// Content-Type header, if the server sent one
    pub content_type: Option<String>,
    /// Response body, byte for byte as the server sent it
    pub body: Vec<u8>,
}

impl FetchedDocument {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can fetch a profile document
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}

/// reqwest-backed Fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a client with a per-request timeout
    //
    // The client is cloned into every worker; cloning a reqwest Client is
    // cheap (it's an Arc around a connection pool).
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("webid-crawler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, PROFILE_ACCEPT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Keep the raw bytes; the corpus stores exactly what was served
        let body = response.bytes().await?.to_vec();

        Ok(FetchedDocument {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
