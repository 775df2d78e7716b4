use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported backend '{backend}' at {api_url}: only the PyPI search page is supported")]
    UnsupportedBackend { backend: String, api_url: String },

    #[error("Search failed on page {page}: {source}")]
    SearchFailed {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed search result: {0}")]
    MalformedResult(String),

    #[error("Invalid sort key: {0} (expected one of: name, version, released)")]
    InvalidSortKey(String),

    #[error("Invalid output format: {0} (expected one of: rich, plain, json)")]
    InvalidFormat(String),

    #[error("Invalid configuration in {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
