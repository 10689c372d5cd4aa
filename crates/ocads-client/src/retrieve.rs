//! Primary fetch with a single mirror attempt on read timeout.

use std::path::PathBuf;

use ocads_common::MedianFile;
use tracing::warn;

use crate::error::FetchError;
use crate::fetch::Fetcher;

/// Fetch `file` from `base_url`; if and only if that read times out, fetch
/// the same file name once from `mirror_url`.
///
/// Every other primary failure is returned as is, and the mirror's outcome
/// is final.
pub async fn retrieve_with_fallback<F>(
    fetcher: &F,
    file: &MedianFile,
    base_url: &str,
    mirror_url: &str,
) -> Result<PathBuf, FetchError>
where
    F: Fetcher + ?Sized,
{
    let filename = file.filename();
    let url = file.url(base_url);

    match fetcher.fetch(&url, &filename).await {
        Err(e) if e.is_read_timeout() => {
            warn!(
                filename = %filename,
                mirror = %mirror_url,
                "Download timed out, trying mirror"
            );
            fetcher.fetch(mirror_url, &filename).await
        }
        other => other,
    }
}
