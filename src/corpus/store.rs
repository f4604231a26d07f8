// src/corpus/store.rs
// =============================================================================
// The CorpusStore trait and its directory-backed implementation.
//
// Key format (encodeURIComponent, plus ".ttl"):
//   https://a.example/profile#me  ->  https%3A%2F%2Fa.example%2Fprofile%23me.ttl
//
// Writes go to a ".tmp" sibling first and are then renamed over the real
// file, so a crash mid-write never leaves a truncated .ttl in the corpus.
// =============================================================================

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::CorpusError;

const ENTRY_EXTENSION: &str = ".ttl";

/// Durable storage for accepted profile documents
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Every identifier currently persisted
    async fn list(&self) -> Result<Vec<String>, CorpusError>;

    /// The stored body for `identifier`
    async fn read(&self, identifier: &str) -> Result<Vec<u8>, CorpusError>;

    /// Stores `body`, replacing any previous entry for `identifier`
    async fn write(&self, identifier: &str, body: &[u8]) -> Result<(), CorpusError>;
}

// urlencoding escapes these, browsers' encodeURIComponent does not
const KEPT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Turns an identifier into a corpus filename
///
/// Matches encodeURIComponent, so corpora written by browser-side tools
/// map each WebID to the same file we would write.
pub fn encode_key(identifier: &str) -> String {
    let mut key = urlencoding::encode(identifier).into_owned();
    // A literal "%28" in the input was itself escaped to "%2528", so these
    // sequences can only come from the marks
    for (escaped, mark) in KEPT_MARKS {
        key = key.replace(escaped, mark);
    }
    key.push_str(ENTRY_EXTENSION);
    key
}

/// Turns a corpus filename back into an identifier
///
/// Returns None for files that are not corpus entries.
pub fn decode_key(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(ENTRY_EXTENSION)?;
    urlencoding::decode(stem).ok().map(|s| s.into_owned())
}

/// A corpus stored as one file per WebID in a directory
#[derive(Debug, Clone)]
pub struct DirCorpus {
    root: PathBuf,
}

impl DirCorpus {
    /// Opens (creating if needed) the corpus directory
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn entry_path(&self, identifier: &str) -> PathBuf {
        self.root.join(encode_key(identifier))
    }
}

#[async_trait]
impl CorpusStore for DirCorpus {
    async fn list(&self) -> Result<Vec<String>, CorpusError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut identifiers = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!(file = ?file_name, "Skipping corpus file with non-UTF-8 name");
                continue;
            };

            if !file_name.ends_with(ENTRY_EXTENSION) {
                continue;
            }

            match decode_key(file_name) {
                Some(identifier) => identifiers.push(identifier),
                None => tracing::warn!(file = file_name, "Skipping corpus file that does not decode"),
            }
        }

        // read_dir order is filesystem-dependent
        identifiers.sort();
        Ok(identifiers)
    }

    async fn read(&self, identifier: &str) -> Result<Vec<u8>, CorpusError> {
        match fs::read(self.entry_path(identifier)).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CorpusError::NotFound(identifier.to_string()))
            }
            Err(e) => Err(CorpusError::Io(e)),
        }
    }

    async fn write(&self, identifier: &str, body: &[u8]) -> Result<(), CorpusError> {
        let path = self.entry_path(identifier);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");

        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
