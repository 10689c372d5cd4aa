//! Fetch-and-cache of remote files.
//!
//! A file is looked up in the cache directory by name. When absent it is
//! streamed to `{name}.partial` next to its final location, checked against
//! `Content-Length`, then moved into place, so the cache never holds a
//! truncated file under the final name. There is no hash check, no retry
//! and no resumption.
//!
//! The request timeout bounds each wait for data (the response headers, then
//! every body chunk), not the whole transfer. A stall before the headers is a
//! `ReadTimeout`; a stall once the body has started is a `BodyTimeout`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{ClientError, FetchError};

/// Source of locally cached copies of remote files.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Return a local path holding the content of `url`, cached under
    /// `filename`. A cached copy is returned without contacting `url`.
    async fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, FetchError>;
}

/// HTTP fetcher backed by a cache directory.
pub struct HttpFetcher {
    client: Client,
    cache_dir: PathBuf,
    read_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self {
            client,
            cache_dir: config.cache_dir.clone(),
            read_timeout: config.request_timeout,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path a file would be cached at.
    pub fn cached_path(&self, filename: &str) -> PathBuf {
        self.cache_dir.join(filename)
    }

    /// GET `url` into `temp_path`, returning the byte count.
    async fn download_to(&self, url: &str, temp_path: &Path) -> Result<u64, FetchError> {
        let response = timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::ReadTimeout {
                url: url.to_string(),
            })?
            .map_err(|e| FetchError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected = response.content_length();
        let written = self.stream_to_file(url, response, temp_path).await?;
        check_length(url, expected, written)?;

        Ok(written)
    }

    /// Stream response body to file.
    async fn stream_to_file(
        &self,
        url: &str,
        response: Response,
        path: &Path,
    ) -> Result<u64, FetchError> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        loop {
            let next = timeout(self.read_timeout, stream.next())
                .await
                .map_err(|_| FetchError::BodyTimeout {
                    url: url.to_string(),
                    received: written,
                })?;
            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| FetchError::Http {
                url: url.to_string(),
                source: e,
            })?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        // Flush and sync
        file.flush().await?;
        file.sync_all().await?;

        Ok(written)
    }
}

/// Compare the bytes written with the advertised `Content-Length`, if any.
fn check_length(url: &str, expected: Option<u64>, written: u64) -> Result<(), FetchError> {
    match expected {
        Some(expected) if expected != written => Err(FetchError::SizeMismatch {
            url: url.to_string(),
            expected,
            actual: written,
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(cache_dir = %self.cache_dir.display()))]
    async fn fetch(&self, url: &str, filename: &str) -> Result<PathBuf, FetchError> {
        let final_path = self.cached_path(filename);
        if fs::try_exists(&final_path).await? {
            debug!(path = %final_path.display(), "Using cached file");
            return Ok(final_path);
        }

        fs::create_dir_all(&self.cache_dir).await?;
        let temp_path = self.cache_dir.join(format!("{}.partial", filename));

        info!(url = %url, path = %final_path.display(), "Downloading");

        let bytes = match self.download_to(url, &temp_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                fs::remove_file(&temp_path).await.ok();
                return Err(e);
            }
        };

        // Move to final location (use copy+delete for cross-filesystem support)
        if fs::rename(&temp_path, &final_path).await.is_err() {
            fs::copy(&temp_path, &final_path).await?;
            fs::remove_file(&temp_path).await?;
        }

        info!(path = %final_path.display(), bytes, "Download completed");
        Ok(final_path)
    }
}
