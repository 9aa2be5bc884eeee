//! Static preview server for the built front end.
//!
//! # Design
//! One fallback handler serves everything: table routes get `index.html`,
//! `/<assets_dir>/...` and other top-level files come straight from the
//! output directory (assets with a long-lived cache header), and the rest
//! is 404. Only plain path components are accepted, so a request can never
//! climb out of the output directory.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes;

/// Ports tried after the configured one when `strict_port` is off.
pub const PORT_PROBE_LIMIT: u16 = 10;

/// Bind the configured address. With `strict_port` an occupied port is an
/// immediate error; otherwise the next ports are probed.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let attempts = if config.strict_port { 1 } else { PORT_PROBE_LIMIT };
    let first = config.port;
    let mut last = first;

    for offset in 0..attempts {
        let Some(port) = first.checked_add(offset) else {
            break;
        };
        last = port;
        let addr = format!("{}:{port}", config.host);
        match TcpListener::bind(&addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse && !config.strict_port => {
                warn!(%addr, "port in use, trying next");
            }
            Err(source) => return Err(ServerError::Bind { addr, source }),
        }
    }

    Err(ServerError::NoFreePort {
        host: config.host.clone(),
        first,
        last,
    })
}

pub fn app(config: ServerConfig) -> Router {
    Router::new().fallback(serve).with_state(Arc::new(config))
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, out_dir = %config.out_dir.display(), "preview server listening");
    axum::serve(listener, app(config)).await?;
    Ok(())
}

async fn serve(State(config): State<Arc<ServerConfig>>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some(route) = routes::resolve(path) {
        debug!(path, view = %route.view, "route");
        return match tokio::fs::read(config.index_path()).await {
            Ok(bytes) => file_response("index.html", bytes),
            Err(e) => {
                error!(index = %config.index_path().display(), error = %e, "index.html unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "index.html unavailable").into_response()
            }
        };
    }

    let Some(relative) = safe_relative(path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let file = config.out_dir.join(&relative);
    match tokio::fs::read(&file).await {
        Ok(bytes) if relative.starts_with(&config.assets_dir) => {
            // Asset names are content-hashed by the build.
            let mut response = file_response(&relative.to_string_lossy(), bytes);
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            );
            response
        }
        Ok(bytes) => file_response(&relative.to_string_lossy(), bytes),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// The request path as a relative file path, or `None` if it has anything
/// other than normal components.
fn safe_relative(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let candidate = Path::new(trimmed);
    candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| candidate.to_path_buf())
}

fn file_response(name: &str, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, content_type(name))], bytes).into_response()
}

fn content_type(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        _ => "application/octet-stream",
    }
}
