// src/crawl/testing.rs
// In-memory Fetcher and CorpusStore doubles used by the crawl tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::corpus::CorpusStore;
use crate::error::{CorpusError, FetchError};
use crate::fetch::{FetchedDocument, Fetcher};
use crate::profile::vocab;

/// A fake web: a fixed map from URL to response
#[derive(Default)]
pub struct ScriptedFetcher {
    documents: HashMap<String, FetchedDocument>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a small Turtle profile for `webid`
    pub fn profile(self, webid: &str, issuer: Option<&str>, knows: &[&str]) -> Self {
        let mut body = format!("<{}> <{}> \"{}\" .\n", webid, vocab::FOAF_NAME, webid);
        if let Some(issuer) = issuer {
            body.push_str(&format!("<{}> <{}> {} .\n", webid, vocab::SOLID_OIDC_ISSUER, issuer));
        }
        for friend in knows {
            body.push_str(&format!("<{}> <{}> <{}> .\n", webid, vocab::FOAF_KNOWS, friend));
        }
        self.raw(webid, &body)
    }

    /// Serves `body` with status 200 for `webid`
    pub fn raw(self, webid: &str, body: &str) -> Self {
        self.respond(webid, 200, body)
    }

    /// Serves arbitrary bytes with status 200 for `webid`
    pub fn raw_bytes(self, webid: &str, body: Vec<u8>) -> Self {
        self.respond_bytes(webid, 200, body)
    }

    pub fn respond(self, webid: &str, status: u16, body: &str) -> Self {
        self.respond_bytes(webid, status, body.as_bytes().to_vec())
    }

    fn respond_bytes(mut self, webid: &str, status: u16, body: Vec<u8>) -> Self {
        let final_url = webid.split('#').next().unwrap_or(webid).to_string();
        self.documents.insert(
            webid.to_string(),
            FetchedDocument {
                status,
                final_url,
                content_type: Some("text/turtle".to_string()),
                body,
            },
        );
        self
    }

    /// Makes every fetch take a while so workers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The body served for `webid`
    pub fn body(&self, webid: &str) -> Option<Vec<u8>> {
        self.documents.get(webid).map(|doc| doc.body.clone())
    }

    pub fn calls(&self, webid: &str) -> usize {
        self.calls.lock().unwrap().get(webid).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Connect(format!("no route to {}", url)))
    }
}

/// A corpus kept in a map
#[derive(Default)]
pub struct MemoryCorpus {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_writes: bool,
    writes: AtomicUsize,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_entry(self, webid: &str, body: impl AsRef<[u8]>) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(webid.to_string(), body.as_ref().to_vec());
        self
    }

    pub fn contains(&self, webid: &str) -> bool {
        self.entries.lock().unwrap().contains_key(webid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, webid: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(webid).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CorpusStore for MemoryCorpus {
    async fn list(&self) -> Result<Vec<String>, CorpusError> {
        Ok(self.keys())
    }

    async fn read(&self, identifier: &str) -> Result<Vec<u8>, CorpusError> {
        self.get(identifier)
            .ok_or_else(|| CorpusError::NotFound(identifier.to_string()))
    }

    async fn write(&self, identifier: &str, body: &[u8]) -> Result<(), CorpusError> {
        if self.fail_writes {
            return Err(CorpusError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only corpus",
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(identifier.to_string(), body.to_vec());
        Ok(())
    }
}
