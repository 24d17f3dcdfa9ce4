//! WebDAV method dispatcher and stub verbs.
//!
//! PROPFIND and GET/HEAD carry the real logic; the write-shaped verbs are
//! stateless stubs so that clients treating the share as a normal DAV
//! mount keep working. Every response carries the `DAV` and
//! `MS-Author-Via` capability headers.

pub mod stream;
pub mod xml;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::server::AppState;

const ALLOWED_METHODS: &str =
    "OPTIONS, GET, HEAD, PROPFIND, PROPPATCH, MKCOL, COPY, MOVE, DELETE, LOCK, UNLOCK";

/// Fallback service handling every WebDAV verb.
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let headers = request.headers().clone();

    debug!(
        "{} {} (user-agent: {})",
        method,
        path,
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
    );

    let mut response = match method.as_str() {
        "GET" | "HEAD" => stream::get_or_head(&state, &method, &path, &headers).await,
        "OPTIONS" => options_response(),
        "PROPFIND" => xml::propfind(&state, &path, &headers).await,
        "PROPPATCH" => proppatch_response(&path),
        "LOCK" => lock_response(),
        "UNLOCK" => StatusCode::NO_CONTENT.into_response(),
        "MKCOL" | "PUT" | "DELETE" | "COPY" | "MOVE" => {
            plain(StatusCode::METHOD_NOT_ALLOWED, "Read-only WebDAV server")
        }
        _ => plain(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    };

    let response_headers = response.headers_mut();
    response_headers.insert("DAV", HeaderValue::from_static("1, 2"));
    response_headers.insert("MS-Author-Via", HeaderValue::from_static("DAV"));
    response
}

/// Short plain-text response, used for 404/405/500 bodies.
pub(crate) fn plain(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

fn options_response() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ALLOW, ALLOWED_METHODS)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "OPTIONS, GET, HEAD, PROPFIND, PROPPATCH",
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "Content-Type, Depth, User-Agent, X-Requested-With, If-Modified-Since, \
             Cache-Control, Range, Authorization",
        )
        .body(Body::empty())
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// 207 with an empty-prop success body; properties never change.
fn proppatch_response(path: &str) -> Response {
    let href = xml::escape_xml(path);
    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>{href}</D:href>
    <D:propstat>
      <D:prop/>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#
    );
    xml::multistatus_response(body)
}

/// Synthesizes an exclusive-write lock nobody ever checks.
///
/// Clients such as macOS Finder refuse to mount shares that reject LOCK,
/// so the bridge hands out opaque one-hour tokens and forgets them.
fn lock_response() -> Response {
    let token = format!(
        "opaquelocktoken:{}-{:08x}",
        Utc::now().timestamp_millis(),
        rand::rng().random::<u32>()
    );

    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:prop xmlns:D="DAV:">
  <D:lockdiscovery>
    <D:activelock>
      <D:locktype><D:write/></D:locktype>
      <D:lockscope><D:exclusive/></D:lockscope>
      <D:depth>0</D:depth>
      <D:timeout>Second-3600</D:timeout>
      <D:locktoken><D:href>{token}</D:href></D:locktoken>
    </D:activelock>
  </D:lockdiscovery>
</D:prop>"#
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
        .header("Lock-Token", format!("<{token}>"))
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
