//! Request path resolution.
//!
//! Maps a raw request path onto the serving root and classifies what it
//! names. Traversal protection is a purely textual scan for `..`; paths are
//! not canonicalized, so symlinks inside the root are followed wherever they
//! point.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

use crate::http::mime;
use crate::http::response::StatusCode;

const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The path contains `..`.
    Traversal,
    NotFound,
    /// The target exists but the server may not inspect it.
    Forbidden,
}

impl InvalidReason {
    pub fn status(&self) -> StatusCode {
        match self {
            InvalidReason::Traversal => StatusCode::BadRequest,
            InvalidReason::NotFound => StatusCode::NotFound,
            InvalidReason::Forbidden => StatusCode::Forbidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    File {
        path: PathBuf,
        size: u64,
        content_type: &'static str,
    },
    Directory {
        path: PathBuf,
        /// Root-relative form with a leading `/`, used for titles and links.
        listing_path: Vec<u8>,
        /// The directory is the serving root itself.
        is_root: bool,
    },
    Invalid(InvalidReason),
}

#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the raw request path. The bytes reach the filesystem
    /// unchanged, so names that are not valid UTF-8 can still be served.
    pub async fn resolve(&self, raw: &[u8]) -> ResolvedTarget {
        let anchored = anchor(strip_index(raw));

        if contains_traversal(raw) {
            return ResolvedTarget::Invalid(InvalidReason::Traversal);
        }

        let path = self.root.join(OsStr::from_bytes(&anchored));
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return ResolvedTarget::Invalid(InvalidReason::Forbidden);
            }
            Err(_) => return ResolvedTarget::Invalid(InvalidReason::NotFound),
        };

        if meta.is_dir() {
            let listing_path = anchored[1..].to_vec();
            let is_root = names_root(&listing_path);
            ResolvedTarget::Directory {
                path,
                listing_path,
                is_root,
            }
        } else {
            let content_type = mime::content_type_for(&path);
            ResolvedTarget::File {
                path,
                size: meta.len(),
                content_type,
            }
        }
    }
}

/// Drops a final `index.html` segment, keeping the separator before it.
///
/// `/docs/index.html` becomes `/docs/`; `/myindex.html` is left alone.
pub fn strip_index(path: &[u8]) -> &[u8] {
    match path.strip_suffix(INDEX_FILE.as_bytes()) {
        Some(rest) if rest.is_empty() || rest.ends_with(b"/") => rest,
        _ => path,
    }
}

/// Prefixes `.` to absolute paths and `./` to relative ones.
pub fn anchor(path: &[u8]) -> Vec<u8> {
    let prefix: &[u8] = if path.starts_with(b"/") { b"." } else { b"./" };
    [prefix, path].concat()
}

/// True if any two adjacent bytes are `..`, wherever they appear.
pub fn contains_traversal(path: &[u8]) -> bool {
    path.windows(2).any(|pair| pair == b"..")
}

fn names_root(listing_path: &[u8]) -> bool {
    Path::new(OsStr::from_bytes(listing_path))
        .components()
        .all(|c| matches!(c, Component::RootDir | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_detection_ignores_redundant_separators() {
        assert!(names_root(b"/"));
        assert!(names_root(b"//"));
        assert!(names_root(b"/./"));
        assert!(!names_root(b"/sub/"));
    }
}
