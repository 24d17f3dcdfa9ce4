//! GET/HEAD streaming proxy onto the backend play endpoint.
//!
//! HEAD is answered from the listing alone. GET opens the backend stream,
//! mirrors its status and range headers, and relays the body chunk by
//! chunk; dropping the response body (client disconnect) drops the
//! upstream connection with it.

use axum::body::Body;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tidedav_core::content_type::content_type_for;
use tidedav_core::{Missing, Resolved, etag, flatten_path, resolve};
use tracing::{error, info};

use super::plain;
use crate::server::AppState;

/// Handles GET and HEAD for file resources.
///
/// Collection and root paths are not streamable and return 404.
pub async fn get_or_head(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Response {
    let torrents = state.backend.list_torrents().await;

    let (torrent, file) = match resolve(path, &torrents) {
        Resolved::File { torrent, file } => (torrent, file),
        Resolved::NotFound(missing) => {
            return plain(StatusCode::NOT_FOUND, missing.message());
        }
        Resolved::Root | Resolved::Collection(_) => {
            return plain(StatusCode::NOT_FOUND, Missing::Path.message());
        }
    };

    let content_type = content_type_for(flatten_path(&file.path));
    let etag = format!("\"{}\"", etag(&torrent.hash, file.id));

    if method == Method::HEAD {
        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, file.length.to_string())
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::ETAG, &etag)
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::empty())
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    }

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    info!(
        "Streaming {}/{} (range: {})",
        torrent.hash,
        file.id,
        range.unwrap_or("none")
    );

    let upstream = match state
        .backend
        .open_stream(&torrent.hash, file.id, range, user_agent)
        .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            error!("Stream error for {}/{}: {}", torrent.hash, file.id, e);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Stream error");
        }
    };

    let status =
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = Response::builder()
        .status(status)
        .header(
            header::CONTENT_TYPE,
            upstream.content_type.as_deref().unwrap_or(content_type),
        )
        .header(
            header::ACCEPT_RANGES,
            upstream.accept_ranges.as_deref().unwrap_or("bytes"),
        )
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::ETAG, &etag)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            "Content-Length, Content-Range, Accept-Ranges",
        );

    if let Some(length) = upstream.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length.to_string());
    } else if file.length > 0 {
        builder = builder.header(header::CONTENT_LENGTH, file.length.to_string());
    }

    if let Some(content_range) = upstream.content_range.as_deref() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }

    builder
        .body(Body::from_stream(upstream.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
