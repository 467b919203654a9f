//! Directory listings.
//!
//! A listing is written to a spool file first so its exact length is known
//! before the response head goes out. The spool file is deleted by the
//! response writer once the body has been sent.

use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::http::response::Response;

const PAGE_TITLE: &str = "switchd web server";

#[derive(Debug, Error)]
pub enum ListingError {
    /// The directory itself could not be enumerated.
    #[error("cannot read directory: {0}")]
    Unreadable(#[source] io::Error),
    /// The spool file could not be created or written.
    #[error("cannot spool listing: {0}")]
    Spool(#[source] io::Error),
}

#[derive(Debug, Clone)]
pub struct DirectoryRenderer {
    spool_dir: PathBuf,
}

impl DirectoryRenderer {
    pub fn new(spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            spool_dir: spool_dir.into(),
        }
    }

    /// Renders `dir` into a spool file and returns a 200 response for it.
    ///
    /// `listing_path` is the root-relative directory path (leading `/`), as
    /// raw bytes. The parent entry is left out when `is_root` is set. Entries
    /// appear in enumeration order; entries whose metadata cannot be read are
    /// skipped. Names are written byte for byte.
    pub async fn render(
        &self,
        dir: &Path,
        listing_path: &[u8],
        is_root: bool,
    ) -> Result<Response, ListingError> {
        let entries = tokio::fs::read_dir(dir)
            .await
            .map_err(ListingError::Unreadable)?;

        let spool_path = self
            .spool_dir
            .join(format!("listing-{}.html", uuid::Uuid::new_v4()));

        match write_listing(&spool_path, entries, listing_path, is_root).await {
            Ok(size) => {
                debug!(
                    "spooled {} byte listing for {}",
                    size,
                    String::from_utf8_lossy(listing_path)
                );
                Ok(Response::spooled_html(spool_path, size))
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&spool_path).await;
                Err(ListingError::Spool(e))
            }
        }
    }
}

async fn write_listing(
    spool_path: &Path,
    mut entries: tokio::fs::ReadDir,
    listing_path: &[u8],
    is_root: bool,
) -> io::Result<u64> {
    let file = File::create(spool_path).await?;
    let mut out = BufWriter::new(file);

    let opening = format!("<html><title>{PAGE_TITLE}</title><body><h3>Listing for ");
    let header: [&[u8]; 3] = [opening.as_bytes(), listing_path, b"</h3><p>"];
    out.write_all(&header.concat()).await?;

    if !is_root {
        out.write_all(&dir_link(&parent_href(listing_path), b"..")).await?;
    }

    let mut base = listing_path.to_vec();
    if !base.ends_with(b"/") {
        base.push(b'/');
    }

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.as_bytes();
        // Follows symlinks, so a link to a directory lists as a directory.
        let Ok(meta) = tokio::fs::metadata(entry.path()).await else {
            continue;
        };

        let href = [base.as_slice(), name].concat();
        let line = if meta.is_dir() {
            dir_link(&href, name)
        } else {
            file_link(&href, name, meta.len())
        };
        out.write_all(&line).await?;
    }

    out.write_all(b"</p></body></html>").await?;
    out.flush().await?;

    Ok(out.into_inner().metadata().await?.len())
}

pub fn file_link(href: &[u8], name: &[u8], size: u64) -> Vec<u8> {
    link(href, name, format!(" ({size})").as_bytes())
}

pub fn dir_link(href: &[u8], label: &[u8]) -> Vec<u8> {
    link(href, label, b" [dir]")
}

fn link(href: &[u8], label: &[u8], suffix: &[u8]) -> Vec<u8> {
    let parts: [&[u8]; 6] = [b"<a href=\"", href, b"\">", label, suffix, b"</a><br>"];
    parts.concat()
}

/// Root-relative path of the parent of `listing_path`.
///
/// ```
/// # use switchd::http::listing::parent_href;
/// assert_eq!(parent_href(b"/sub/"), b"/");
/// assert_eq!(parent_href(b"/a/b"), b"/a");
/// ```
pub fn parent_href(listing_path: &[u8]) -> Vec<u8> {
    let end = listing_path
        .iter()
        .rposition(|&b| b != b'/')
        .map_or(0, |last| last + 1);
    let trimmed = &listing_path[..end];
    match trimmed.iter().rposition(|&b| b == b'/') {
        Some(0) | None => b"/".to_vec(),
        Some(idx) => trimmed[..idx].to_vec(),
    }
}
