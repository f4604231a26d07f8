// src/error.rs
// =============================================================================
// Typed errors for the three collaborators the crawler talks to:
// - FetchError: the HTTP transport
// - ParseError: the Turtle profile parser
// - CorpusError: the on-disk corpus of accepted profiles
//
// None of these ever stop a crawl. A worker turns them into an outcome for
// its one item and moves on. Only main.rs (via anyhow) treats a corpus error
// during startup as fatal.
// =============================================================================

use thiserror::Error;

/// Errors from fetching a document over HTTP
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Could not connect (DNS failure, refused, unreachable)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Redirect loop or too many hops
    #[error("too many redirects")]
    TooManyRedirects,

    /// Any other transport problem
    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else {
            FetchError::Other(error.to_string())
        }
    }
}

/// Errors from turning a document body into a ProfileDocument
#[derive(Debug, Error)]
pub enum ParseError {
    /// The base IRI handed to the parser is not a valid IRI
    #[error("invalid base IRI '{iri}': {reason}")]
    InvalidBase { iri: String, reason: String },

    /// The body is not UTF-8, so it cannot be Turtle
    #[error("body is not UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The body is not well-formed Turtle
    #[error("malformed Turtle: {0}")]
    Syntax(String),
}

/// Errors from the corpus directory
#[derive(Debug, Error)]
pub enum CorpusError {
    /// No entry exists for this identifier
    #[error("no corpus entry for {0}")]
    NotFound(String),

    /// Filesystem failure
    #[error("corpus I/O error: {0}")]
    Io(#[from] std::io::Error),
}
