// src/fetch/error.rs
// Errors raised while downloading or caching archive pages.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("cache error at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn status(url: &str, status: StatusCode) -> Self {
        FetchError::Status {
            url: url.to_string(),
            status,
        }
    }

    pub fn cache(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Cache {
            path: path.into(),
            source,
        }
    }
}
