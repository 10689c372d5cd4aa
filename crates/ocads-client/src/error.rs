//! Error types for retrieval.

use netcdf_parser::NetCdfError;
use ocads_common::OcadsError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure to fetch one URL into the cache.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connected, but the response headers did not arrive in time.
    #[error("Read timed out fetching {url}")]
    ReadTimeout { url: String },

    /// The body started but then went quiet for longer than the timeout.
    #[error("Response body from {url} stalled after {received} bytes")]
    BodyTimeout { url: String, received: u64 },

    /// Could not establish a connection (includes connect timeouts).
    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Download size mismatch for {url}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Sort a transport error into connect failure, read timeout or other.
    ///
    /// Connect timeouts report as both timeout and connect; they count as
    /// connect failures.
    pub fn classify(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            FetchError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_timeout() {
            FetchError::ReadTimeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Whether this failure should send the request to the mirror.
    pub fn is_read_timeout(&self) -> bool {
        matches!(self, FetchError::ReadTimeout { .. })
    }
}

/// Failure of a whole retrieval call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidRequest(#[from] OcadsError),

    #[error("Failed to fetch {filename}: {source}")]
    Fetch {
        filename: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to read {filename}: {source}")]
    Dataset {
        filename: String,
        #[source]
        source: NetCdfError,
    },

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
