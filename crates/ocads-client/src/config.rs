//! Client configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use ocads_common::{DEFAULT_BASE_URL, DEFAULT_MIRROR_URL};

/// Longest wait for response headers or for the next body chunk.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where files come from and where they are cached.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Archive directory holding the median files
    pub base_url: String,
    /// Mirror location tried once after a read timeout
    pub mirror_url: String,
    /// Local cache directory
    pub cache_dir: PathBuf,
    /// Longest wait for data: the response headers, then each body chunk
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
            cache_dir: default_cache_dir(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `OCADS_BASE_URL`, `OCADS_MIRROR_URL`,
    /// `OCADS_CACHE_DIR` and `OCADS_TIMEOUT_SECS`.
    ///
    /// Unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("OCADS_BASE_URL").unwrap_or(defaults.base_url),
            mirror_url: env::var("OCADS_MIRROR_URL").unwrap_or(defaults.mirror_url),
            cache_dir: env::var("OCADS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            request_timeout: env::var("OCADS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            connect_timeout: defaults.connect_timeout,
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_mirror_url(mut self, mirror_url: impl Into<String>) -> Self {
        self.mirror_url = mirror_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// The per-user cache directory: `$XDG_CACHE_HOME/ocads`, then
/// `$HOME/.cache/ocads`, then `ocads` under the system temp directory.
pub fn default_cache_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("ocads");
    }
    if let Some(home) = env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".cache").join("ocads");
    }
    env::temp_dir().join("ocads")
}
