//! PROPFIND handling and multistatus document rendering.
//!
//! Documents are assembled as strings in the shape WebDAV clients expect:
//! one `<D:response>` per resource, properties inside a single 200 OK
//! propstat. Only the `DAV:` namespace is used.

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use tidedav_core::content_type::content_type_for;
use tidedav_core::{FileEntry, Resolved, Torrent, etag, flatten_path, resolve};
use tracing::info;

use super::plain;
use crate::server::AppState;

/// Display name advertised for the share root.
const ROOT_DISPLAY_NAME: &str = "TorrServer";

const SUPPORTED_LOCK: &str = r#"<D:supportedlock>
          <D:lockentry>
            <D:lockscope><D:exclusive/></D:lockscope>
            <D:locktype><D:write/></D:locktype>
          </D:lockentry>
        </D:supportedlock>"#;

/// Handles PROPFIND for root, torrent collections and file resources.
pub async fn propfind(state: &AppState, path: &str, headers: &HeaderMap) -> Response {
    let depth = headers
        .get("depth")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("0");
    let list_children = depth != "0";

    info!("PROPFIND {} (depth: {})", path, depth);

    let torrents = state.backend.list_torrents().await;

    match resolve(path, &torrents) {
        Resolved::Root => multistatus_response(root_document(&torrents, list_children)),
        Resolved::Collection(torrent) => {
            multistatus_response(collection_document(torrent, list_children))
        }
        Resolved::File { torrent, file } => {
            multistatus_response(file_document(torrent, &file))
        }
        Resolved::NotFound(missing) => plain(StatusCode::NOT_FOUND, missing.message()),
    }
}

/// Wraps a finished multistatus body in the 207 envelope.
pub fn multistatus_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::MULTI_STATUS)
        .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
        .header("DAV", "1, 2")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Escapes text content for insertion into XML.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders `getlastmodified` (HTTP-date) and `creationdate` (ISO 8601)
/// from an optional epoch timestamp, defaulting to now.
fn format_dates(timestamp: Option<i64>) -> (String, String) {
    let when: DateTime<Utc> = timestamp
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(Utc::now);

    (
        when.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        when.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

fn document_header() -> String {
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<D:multistatus xmlns:D=\"DAV:\">".to_string()
}

/// Multistatus for `/`: the root collection, plus one child per torrent
/// when children are requested.
pub fn root_document(torrents: &[Torrent], list_children: bool) -> String {
    let (last_modified, creation) = format_dates(None);

    let mut doc = document_header();
    doc.push_str(&format!(
        r#"
  <D:response>
    <D:href>/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
        <D:getlastmodified>{last_modified}</D:getlastmodified>
        <D:creationdate>{creation}</D:creationdate>
        <D:displayname>{ROOT_DISPLAY_NAME}</D:displayname>
        {SUPPORTED_LOCK}
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>"#
    ));

    if list_children {
        for torrent in torrents {
            let name = torrent.display_name();
            let href = urlencoding::encode(name);
            let display = escape_xml(name);
            let (last_modified, creation) = format_dates(torrent.timestamp);

            doc.push_str(&format!(
                r#"
  <D:response>
    <D:href>/{href}/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
        <D:getlastmodified>{last_modified}</D:getlastmodified>
        <D:creationdate>{creation}</D:creationdate>
        <D:displayname>{display}</D:displayname>
        <D:getcontentlength>0</D:getcontentlength>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>"#
            ));
        }
    }

    doc.push_str("\n</D:multistatus>");
    doc
}

/// Multistatus for a torrent collection, with one child per file when
/// children are requested. Colliding flattened names are emitted as-is.
pub fn collection_document(torrent: &Torrent, list_children: bool) -> String {
    let name = torrent.display_name();
    let href = urlencoding::encode(name).into_owned();
    let display = escape_xml(name);
    let (last_modified, creation) = format_dates(torrent.timestamp);

    let mut doc = document_header();
    doc.push_str(&format!(
        r#"
  <D:response>
    <D:href>/{href}/</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype><D:collection/></D:resourcetype>
        <D:getlastmodified>{last_modified}</D:getlastmodified>
        <D:creationdate>{creation}</D:creationdate>
        <D:displayname>{display}</D:displayname>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>"#
    ));

    if list_children {
        for file in torrent.files() {
            doc.push_str(&file_response(torrent, &href, &file, &last_modified, &creation, false));
        }
    }

    doc.push_str("\n</D:multistatus>");
    doc
}

/// Multistatus for a single file resource.
pub fn file_document(torrent: &Torrent, file: &FileEntry) -> String {
    let href = urlencoding::encode(torrent.display_name()).into_owned();
    let (last_modified, creation) = format_dates(torrent.timestamp);

    let mut doc = document_header();
    doc.push_str(&file_response(torrent, &href, file, &last_modified, &creation, true));
    doc.push_str("\n</D:multistatus>");
    doc
}

fn file_response(
    torrent: &Torrent,
    collection_href: &str,
    file: &FileEntry,
    last_modified: &str,
    creation: &str,
    with_lock: bool,
) -> String {
    let flat = flatten_path(&file.path);
    let file_href = urlencoding::encode(flat);
    let display = escape_xml(flat);
    let content_type = content_type_for(flat);
    let etag = etag(&torrent.hash, file.id);
    let length = file.length;

    let lock = if with_lock {
        format!("\n        {SUPPORTED_LOCK}")
    } else {
        String::new()
    };

    format!(
        r#"
  <D:response>
    <D:href>/{collection_href}/{file_href}</D:href>
    <D:propstat>
      <D:prop>
        <D:resourcetype/>
        <D:getcontentlength>{length}</D:getcontentlength>
        <D:getlastmodified>{last_modified}</D:getlastmodified>
        <D:creationdate>{creation}</D:creationdate>
        <D:displayname>{display}</D:displayname>
        <D:getcontenttype>{content_type}</D:getcontenttype>
        <D:getetag>"{etag}"</D:getetag>{lock}
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>"#
    )
}
