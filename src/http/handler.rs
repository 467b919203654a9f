use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::http::listing::{DirectoryRenderer, ListingError};
use crate::http::request::Request;
use crate::http::resolver::{ResolvedTarget, Resolver};
use crate::http::response::{Response, StatusCode};

/// Produces the response for a parsed GET request.
///
/// Shared read-only by every worker session.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    resolver: Resolver,
    renderer: DirectoryRenderer,
}

impl RequestHandler {
    pub fn new(root: impl Into<PathBuf>, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver: Resolver::new(root),
            renderer: DirectoryRenderer::new(spool_dir),
        }
    }

    pub async fn respond(&self, request: &Request) -> Response {
        match self.resolver.resolve(&request.path).await {
            ResolvedTarget::File {
                path,
                size,
                content_type,
            } => match tokio::fs::File::open(&path).await {
                Ok(file) => Response::file(file, size, content_type),
                Err(e) => Response::error(open_failure_status(&e)),
            },

            ResolvedTarget::Directory {
                path,
                listing_path,
                is_root,
            } => match self.renderer.render(&path, &listing_path, is_root).await {
                Ok(response) => response,
                Err(ListingError::Unreadable(e)) => {
                    warn!("listing {}: {}", path.display(), e);
                    Response::error(open_failure_status(&e))
                }
                Err(e) => {
                    warn!("listing {}: {}", path.display(), e);
                    Response::error(StatusCode::InternalServerError)
                }
            },

            ResolvedTarget::Invalid(reason) => Response::error(reason.status()),
        }
    }
}

fn open_failure_status(e: &io::Error) -> StatusCode {
    match e.kind() {
        io::ErrorKind::PermissionDenied => StatusCode::Forbidden,
        io::ErrorKind::NotFound => StatusCode::NotFound,
        _ => StatusCode::InternalServerError,
    }
}
