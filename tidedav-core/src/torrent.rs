//! Torrent and file models as TorrServer reports them.
//!
//! TorrServer's list action returns torrent records whose file list is
//! embedded as a JSON string in the `data` field. A missing or malformed
//! payload is not an error: the torrent is still browsable as an empty
//! collection.

use serde::Deserialize;
use tracing::debug;

/// One torrent as returned by the backend's `{"action":"list"}` call.
///
/// Fetched fresh for every inbound request and never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Torrent {
    pub hash: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Epoch seconds; absent means "now" at response time
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Opaque JSON string holding the embedded file list
    #[serde(default)]
    pub data: Option<String>,
}

/// One streamable file inside a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(default)]
    pub length: u64,
    pub id: i64,
}

/// Shape of the embedded `data` payload: `{"TorrServer":{"Files":[...]}}`.
#[derive(Debug, Deserialize)]
struct EmbeddedData {
    #[serde(rename = "TorrServer")]
    torr_server: Option<EmbeddedFiles>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedFiles {
    #[serde(rename = "Files", default)]
    files: Vec<FileEntry>,
}

impl Torrent {
    /// Name the torrent is exposed under in WebDAV.
    ///
    /// First non-empty of title, name, hash. This is the torrent's WebDAV
    /// identity; two torrents with equal display names shadow each other.
    pub fn display_name(&self) -> &str {
        if let Some(title) = self.title.as_deref()
            && !title.is_empty()
        {
            return title;
        }
        if let Some(name) = self.name.as_deref()
            && !name.is_empty()
        {
            return name;
        }
        &self.hash
    }

    /// Extracts the file list from the embedded `data` payload.
    ///
    /// Absent or malformed payloads yield an empty list; the failure is
    /// logged and browsing continues with an empty collection.
    pub fn files(&self) -> Vec<FileEntry> {
        let Some(data) = self.data.as_deref() else {
            return Vec::new();
        };

        match serde_json::from_str::<EmbeddedData>(data) {
            Ok(parsed) => parsed
                .torr_server
                .map(|inner| inner.files)
                .unwrap_or_default(),
            Err(e) => {
                debug!(
                    "Failed to parse embedded file data for {}: {}",
                    self.display_name(),
                    e
                );
                Vec::new()
            }
        }
    }
}

/// Reduces a backend file path to its final segment for WebDAV display.
pub fn flatten_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Builds the ETag value for a file, stable across requests.
pub fn etag(hash: &str, file_id: i64) -> String {
    format!("{hash}-{file_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent_with_data(data: &str) -> Torrent {
        Torrent {
            hash: "abc".to_string(),
            title: Some("Movie".to_string()),
            name: None,
            timestamp: None,
            data: Some(data.to_string()),
        }
    }

    #[test]
    fn display_name_prefers_title() {
        let t = Torrent {
            hash: "abc".to_string(),
            title: Some("Title".to_string()),
            name: Some("Name".to_string()),
            timestamp: None,
            data: None,
        };
        assert_eq!(t.display_name(), "Title");
    }

    #[test]
    fn display_name_falls_back_to_name_then_hash() {
        let mut t = Torrent {
            hash: "abc".to_string(),
            title: Some(String::new()),
            name: Some("Name".to_string()),
            timestamp: None,
            data: None,
        };
        assert_eq!(t.display_name(), "Name");

        t.name = None;
        assert_eq!(t.display_name(), "abc");
    }

    #[test]
    fn files_parsed_from_embedded_payload() {
        let t = torrent_with_data(
            r#"{"TorrServer":{"Files":[{"path":"Movie/movie.mkv","length":1000,"id":1}]}}"#,
        );
        let files = t.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "Movie/movie.mkv");
        assert_eq!(files[0].length, 1000);
        assert_eq!(files[0].id, 1);
    }

    #[test]
    fn malformed_payload_yields_no_files() {
        assert!(torrent_with_data("not json").files().is_empty());
        assert!(torrent_with_data("{}").files().is_empty());
        assert!(torrent_with_data(r#"{"TorrServer":{}}"#).files().is_empty());
    }

    #[test]
    fn missing_payload_yields_no_files() {
        let t = Torrent {
            hash: "abc".to_string(),
            title: None,
            name: None,
            timestamp: None,
            data: None,
        };
        assert!(t.files().is_empty());
    }

    #[test]
    fn flatten_takes_last_segment() {
        assert_eq!(flatten_path("Season 1/Episode 3.mkv"), "Episode 3.mkv");
        assert_eq!(flatten_path("movie.mkv"), "movie.mkv");
        assert_eq!(flatten_path("a/b/c.srt"), "c.srt");
    }

    #[test]
    fn etag_is_deterministic() {
        assert_eq!(etag("abc", 1), "abc-1");
        assert_eq!(etag("abc", 1), etag("abc", 1));
    }
}
