use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read cached document '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("failed to write cached document '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("failed to calculate cache age for '{0}'")]
    CacheAge(PathBuf, #[source] SystemTimeError),

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("the place '{place}' does not resolve to a forecast resource")]
    LocationInvalid { place: String },

    #[error("could not determine service state for {url} after {attempts} attempts")]
    ServiceUnknown { url: String, attempts: usize },

    #[error("empty response from {url} and no cached document to fall back on")]
    EmptyResponse { url: String },
}
