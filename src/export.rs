// src/export.rs
// =============================================================================
// Compacts the corpus into one JSON-LD shaped file for the search front end.
//
// How it works:
// 1. List every WebID in the corpus
// 2. Read and parse the stored Turtle (a few files at a time)
// 3. Keep the properties the front end shows: names, issuers, storage, images
// 4. Drop profiles that have nothing but their @id
// 5. Write {"@context": ..., "@graph": [...]} to the output path
//
// A file that fails to read or parse is counted and logged, never fatal.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::{json, Value};

use crate::corpus::CorpusStore;
use crate::profile::{parse_profile, NonEmpty, ProfileDocument};

// How many corpus files are read at once
const READ_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRef {
    #[serde(rename = "@id")]
    pub id: String,
}

/// One profile in the exported @graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "foaf:name", skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(rename = "schema:name", skip_serializing_if = "Option::is_none")]
    pub schema_names: Option<Vec<String>>,
    #[serde(rename = "solid:oidcIssuer", skip_serializing_if = "Option::is_none")]
    pub oidc_issuers: Option<Vec<IdRef>>,
    #[serde(rename = "pim:storage", skip_serializing_if = "Option::is_none")]
    pub storage: Option<Vec<IdRef>>,
    #[serde(rename = "foaf:img", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<IdRef>>,
}

impl ProfileRecord {
    pub fn from_profile(profile: ProfileDocument) -> Self {
        Self {
            id: profile.subject,
            names: profile.names.map(NonEmpty::into_vec),
            schema_names: profile.schema_names.map(NonEmpty::into_vec),
            oidc_issuers: profile.oidc_issuers.map(id_refs),
            storage: profile.storage.map(id_refs),
            images: profile.images.map(id_refs),
        }
    }

    /// True if anything beyond the @id survived
    pub fn has_data(&self) -> bool {
        self.names.is_some()
            || self.schema_names.is_some()
            || self.oidc_issuers.is_some()
            || self.storage.is_some()
            || self.images.is_some()
    }
}

fn id_refs(values: NonEmpty<String>) -> Vec<IdRef> {
    values.into_iter().map(|id| IdRef { id }).collect()
}

/// What the export did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Profiles written to the @graph
    pub exported: usize,
    /// Parsed fine but had no exportable data
    pub empty: usize,
    /// Could not be read or parsed
    pub errors: usize,
    pub output: PathBuf,
}

// The JSON-LD context shared by every record
fn context() -> Value {
    json!({
        "foaf": "http://xmlns.com/foaf/0.1/",
        "solid": "http://www.w3.org/ns/solid/terms#",
        "pim": "http://www.w3.org/ns/pim/space#",
        "schema": "https://schema.org/",
        "xsd": "http://www.w3.org/2001/XMLSchema#",
        "foaf:name": { "@id": "http://xmlns.com/foaf/0.1/name", "@type": "xsd:string" },
        "schema:name": { "@id": "https://schema.org/name", "@type": "xsd:string" },
        "foaf:knows": { "@id": "http://xmlns.com/foaf/0.1/knows", "@type": "@id" },
        "solid:oidcIssuer": { "@id": "http://www.w3.org/ns/solid/terms#oidcIssuer", "@type": "@id" },
        "pim:storage": { "@id": "http://www.w3.org/ns/pim/space#storage", "@type": "@id" },
        "foaf:img": { "@id": "http://xmlns.com/foaf/0.1/img", "@type": "@id" }
    })
}

/// Builds the export document from the corpus without writing it
pub async fn build_export(corpus: &dyn CorpusStore) -> Result<(Value, ExportReport)> {
    let webids = corpus
        .list()
        .await
        .context("Could not list the corpus directory")?;

    tracing::info!(count = webids.len(), "Found WebID profiles to process");

    // buffered() (not buffer_unordered) keeps the @graph in corpus order
    let loaded: Vec<(String, Result<ProfileDocument>)> = stream::iter(webids)
        .map(|webid| async move {
            let result = load_profile(corpus, &webid).await;
            (webid, result)
        })
        .buffered(READ_CONCURRENCY)
        .collect()
        .await;

    let mut records = Vec::new();
    let mut empty = 0;
    let mut errors = 0;

    for (webid, result) in loaded {
        match result {
            Ok(profile) => {
                let record = ProfileRecord::from_profile(profile);
                if record.has_data() {
                    records.push(record);
                } else {
                    empty += 1;
                }
            }
            Err(e) => {
                errors += 1;
                tracing::error!(webid = %webid, error = %e, "Error processing profile");
            }
        }
    }

    let report = ExportReport {
        exported: records.len(),
        empty,
        errors,
        output: PathBuf::new(),
    };

    let document = json!({
        "@context": context(),
        "@graph": records,
    });

    Ok((document, report))
}

async fn load_profile(corpus: &dyn CorpusStore, webid: &str) -> Result<ProfileDocument> {
    let body = corpus.read(webid).await?;
    let body = String::from_utf8(body).context("profile is not valid UTF-8")?;
    // The stored document is parsed against its own WebID
    Ok(parse_profile(&body, webid, webid)?)
}

/// Builds the export and writes it to `output`
pub async fn export_corpus(corpus: &dyn CorpusStore, output: &Path) -> Result<ExportReport> {
    let (document, mut report) = build_export(corpus).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    let text = serde_json::to_string_pretty(&document)?;
    tokio::fs::write(output, text)
        .await
        .with_context(|| format!("Could not write {}", output.display()))?;

    report.output = output.to_path_buf();
    Ok(report)
}
