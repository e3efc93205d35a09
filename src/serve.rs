//! Development server.
//!
//! Answers content requests on demand, rendering straight from the source
//! tree on every request. Nothing is cached and nothing is written to disk.
//!
//! ## Request Routing
//!
//! With content directory `docs`:
//!
//! | Request | Answer |
//! |---------|--------|
//! | `/docs/guide/index.json` | index of `docs/guide/` |
//! | `/docs/guide/setup.json` | `docs/guide/setup.md`, transformed |
//! | `/docs/img/diagram.svg` | raw file from the static file service |
//! | `/docs/guide/setup.md` | raw source from the static file service |
//! | `/other/thing.json` | not intercepted |
//!
//! The [`DevAdapter`] decides per request whether to answer it. When it
//! declines, the request continues down the stack to a `tower-http`
//! [`ServeDir`] mounted at the prefix, which serves the file raw (or 404s).
//! Anything not ending in `.json` is declined.
//!
//! A document request is declined when its `.md` source does not exist, and
//! an index request when its directory does not exist. A directory that exists
//! but holds no eligible markdown answers `[]`.
//!
//! ## Errors
//!
//! The adapter never turns a failure into JSON. Read and transform failures
//! surface as [`ServeError`], whose [`IntoResponse`] implementation is the
//! error chain: `404` for missing sources, `500` otherwise. Response bodies
//! are generic; the full error is logged.

use crate::content::{self, ContentError};
use crate::scan::{self, Profile, ScanError};
use axum::Router;
use axum::extract::{OriginalUri, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        // Bodies stay generic; the full error (with filesystem paths) is logged.
        let (status, body) = match &self {
            ServeError::Scan(ScanError::NotFound(_)) => (StatusCode::NOT_FOUND, "Not found"),
            ServeError::Content(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Malformed front matter, see the server log",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render content, see the server log",
            ),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// What a request path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Not a content JSON request; let the next handler have it.
    Decline,
    /// Directory index of the given directory.
    Index(PathBuf),
    /// Single document rendered from the given `.md` file.
    Document(PathBuf),
}

/// Stateless request interceptor for one content directory.
#[derive(Debug, Clone)]
pub struct DevAdapter {
    content_root: PathBuf,
    prefix: String,
}

impl DevAdapter {
    /// `content_root` is where sources live on disk; `prefix` is the URL path
    /// segment(s) they are served under.
    pub fn new(content_root: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            content_root: content_root.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify a request path. Pure; touches no files.
    pub fn intercept(&self, path: &str) -> Interception {
        let Some(rest) = path
            .strip_prefix('/')
            .and_then(|p| p.strip_prefix(self.prefix.as_str()))
            .and_then(|p| p.strip_prefix('/'))
        else {
            return Interception::Decline;
        };
        if !rest.ends_with(".json") {
            return Interception::Decline;
        }

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            let Ok(segment) = urlencoding::decode(raw) else {
                return Interception::Decline;
            };
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\'])
            {
                return Interception::Decline;
            }
            segments.push(segment.into_owned());
        }

        let Some(file_name) = segments.pop() else {
            return Interception::Decline;
        };
        let mut target = self.content_root.clone();
        target.extend(&segments);

        if file_name == "index.json" {
            return Interception::Index(target);
        }

        let Some(stem) = file_name.strip_suffix(".json") else {
            return Interception::Decline;
        };
        let source_name = format!("{stem}.md");
        if !scan::is_eligible(&source_name) {
            return Interception::Decline;
        }
        target.push(source_name);
        Interception::Document(target)
    }

    /// Produce the JSON body for `path`, or `None` to decline.
    pub async fn respond(&self, path: &str) -> Result<Option<String>, ServeError> {
        match self.intercept(path) {
            Interception::Decline => Ok(None),
            Interception::Document(source) => document_json(source).await,
            Interception::Index(dir) => index_json(dir).await,
        }
    }
}

async fn document_json(source: PathBuf) -> Result<Option<String>, ServeError> {
    if !tokio::fs::metadata(&source)
        .await
        .is_ok_and(|m| m.is_file())
    {
        return Ok(None);
    }
    let file = scan::read_source_async(&source).await?;
    let document = content::transform(&file)?;
    Ok(Some(content::to_json(&document)?))
}

async fn index_json(dir: PathBuf) -> Result<Option<String>, ServeError> {
    tokio::task::spawn_blocking(move || -> Result<Option<String>, ServeError> {
        if !dir.is_dir() {
            return Ok(None);
        }
        let paths = scan::scan_dir(&dir, Profile::Documents)?;
        let files = paths
            .iter()
            .map(|path| scan::read_source(path))
            .collect::<Result<Vec<_>, _>>()?;
        let index = content::build_index(&files)?;
        Ok(Some(content::to_json(&index)?))
    })
    .await?
}

/// Middleware in front of the static file service.
async fn intercept(
    State(adapter): State<Arc<DevAdapter>>,
    request: Request,
    next: Next,
) -> Response {
    // Nesting strips the prefix from `uri()`; route on the full path.
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    match adapter.respond(&path).await {
        Ok(Some(json)) => {
            tracing::debug!(%path, "rendered content");
            ([(header::CONTENT_TYPE, "application/json")], json).into_response()
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            tracing::warn!(%path, error = %err, "content request failed");
            err.into_response()
        }
    }
}

/// Router serving one content directory under its prefix.
pub fn router(adapter: DevAdapter) -> Router {
    let mount = format!("/{}", adapter.prefix());
    let static_files = ServeDir::new(adapter.content_root());

    Router::new()
        .nest_service(&mount, static_files)
        .layer(middleware::from_fn_with_state(Arc::new(adapter), intercept))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(adapter: DevAdapter, addr: &str) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let local = listener.local_addr().map_err(ServeError::Server)?;
    tracing::info!(
        "serving {} at http://{}/{}/",
        adapter.content_root().display(),
        local,
        adapter.prefix()
    );

    axum::serve(listener, router(adapter))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Server)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
