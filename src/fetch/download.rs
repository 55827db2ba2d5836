// src/fetch/download.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::errors::{Result, ShipwrightError};

/// Trailing path segment appended by some hosting redirectors; it carries
/// no file name information and is skipped when deriving cache names.
const REDIRECT_SUFFIX: &str = "download";

/// Derive the cache file name for a URL: the final non-empty path segment
/// that is not the literal redirect suffix. Query strings are ignored.
pub fn cached_file_name(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ShipwrightError::TransferFailed {
        url: url.to_string(),
        reason: format!("invalid URL: {e}"),
    })?;

    if let Some(segments) = parsed.path_segments() {
        for segment in segments.rev() {
            if !segment.is_empty() && segment != REDIRECT_SUFFIX {
                return Ok(segment.to_string());
            }
        }
    }

    Err(ShipwrightError::TransferFailed {
        url: url.to_string(),
        reason: "no usable file name in URL path".to_string(),
    })
}

/// Fetch `url` into `download_dir`, returning the local path.
///
/// A file already present at the derived path is proof of a complete prior
/// fetch and is returned without any network access, so this is safe to
/// call arbitrarily many times. Otherwise the response body is streamed to
/// a sibling part file and renamed into place only on full success; the
/// final path never exists in a partial state.
pub async fn fetch_cached(url: &str, download_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(download_dir)
        .await
        .with_context(|| format!("creating download dir {:?}", download_dir))?;

    let file_name = cached_file_name(url)?;
    let dest = download_dir.join(&file_name);

    if dest.is_file() {
        info!(url = %url, file = %dest.display(), "using cached file");
        return Ok(dest);
    }

    info!(url = %url, file = %dest.display(), "downloading");

    let response = match reqwest::get(url).await.and_then(|r| r.error_for_status()) {
        Ok(response) => response,
        Err(e) => {
            return Err(ShipwrightError::TransferFailed {
                url: url.to_string(),
                reason: e.to_string(),
            });
        }
    };

    let url_for_chunks = url.to_string();
    let stream = response.bytes_stream().map(move |chunk| {
        chunk.map_err(|e| ShipwrightError::TransferFailed {
            url: url_for_chunks.clone(),
            reason: e.to_string(),
        })
    });

    store_stream(&dest, Box::pin(stream)).await?;
    Ok(dest)
}

/// Write a chunk stream to `dest` atomically: bytes go to a sibling
/// `<name>.part` file which is renamed over `dest` only after the stream
/// ends successfully. On any error the part file is deleted and the error
/// propagated, leaving `dest` untouched.
///
/// The rename is the only cross-process coordination: concurrent fetchers
/// of the same URL may both write (distinctly failing or succeeding) part
/// files, but `dest` only ever transitions from absent to complete.
pub async fn store_stream<S>(dest: &Path, mut stream: S) -> Result<()>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let part = part_path(dest);

    match write_chunks(&part, &mut stream).await {
        Ok(()) => {
            fs::rename(&part, dest)
                .await
                .with_context(|| format!("renaming {:?} into place", part))?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&part).await;
            Err(err)
        }
    }
}

async fn write_chunks<S>(part: &Path, stream: &mut S) -> Result<()>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    let mut file = fs::File::create(part)
        .await
        .with_context(|| format!("creating part file {:?}", part))?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("writing to part file {:?}", part))?;
    }

    file.flush()
        .await
        .with_context(|| format!("flushing part file {:?}", part))?;
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Make a cached file available at `dest` without duplicating storage when
/// the filesystem allows it: hard-link, falling back to a copy. A
/// pre-existing destination is treated as already installed and skipped.
pub fn install_from_cache(cached: &Path, dest: &Path) -> Result<()> {
    if dest.is_file() {
        debug!(file = %dest.display(), "already installed");
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }

    match std::fs::hard_link(cached, dest) {
        Ok(()) => {
            info!(file = %dest.display(), "installed from cache (hard link)");
            Ok(())
        }
        Err(link_err) => {
            debug!(error = %link_err, "hard link unavailable, copying instead");
            std::fs::copy(cached, dest)
                .with_context(|| format!("copying {:?} to {:?}", cached, dest))?;
            info!(file = %dest.display(), "installed from cache (copy)");
            Ok(())
        }
    }
}
