//! Maps decoded WebDAV URL paths onto backend torrents and files.
//!
//! The tree is two levels deep: root, one collection per torrent, and flat
//! file resources inside each collection. Resolution is stateless and runs
//! against a freshly fetched torrent list on every request.

use crate::torrent::{FileEntry, Torrent, flatten_path};

/// Outcome of resolving a WebDAV path against the current torrent list.
#[derive(Debug)]
pub enum Resolved<'a> {
    Root,
    Collection(&'a Torrent),
    File {
        torrent: &'a Torrent,
        file: FileEntry,
    },
    NotFound(Missing),
}

/// What exactly was missing, for the 404 body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Torrent,
    File,
    Path,
}

impl Missing {
    /// Plain-text body for the 404 response.
    pub fn message(self) -> &'static str {
        match self {
            Missing::Torrent => "Torrent not found",
            Missing::File => "File not found",
            Missing::Path => "Not found",
        }
    }
}

/// Splits a raw URL path into decoded segments, dropping empties.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|d| d.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect()
}

/// Resolves a URL path to a node in the WebDAV tree.
///
/// Torrents are matched by exact display name, first match wins. Files are
/// matched by exact backend path first, then by flattened name, again first
/// match in backend order.
pub fn resolve<'a>(path: &str, torrents: &'a [Torrent]) -> Resolved<'a> {
    let parts = path_segments(path);

    if parts.is_empty() {
        return Resolved::Root;
    }

    let Some(torrent) = torrents.iter().find(|t| t.display_name() == parts[0]) else {
        return Resolved::NotFound(Missing::Torrent);
    };

    if parts.len() == 1 {
        return Resolved::Collection(torrent);
    }

    let requested = parts[1..].join("/");
    let files = torrent.files();
    let file = files
        .iter()
        .find(|f| f.path == requested)
        .or_else(|| files.iter().find(|f| flatten_path(&f.path) == requested));

    match file {
        Some(file) => Resolved::File {
            torrent,
            file: file.clone(),
        },
        None => Resolved::NotFound(Missing::File),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torrent(hash: &str, title: &str, data: Option<&str>) -> Torrent {
        Torrent {
            hash: hash.to_string(),
            title: Some(title.to_string()),
            name: None,
            timestamp: None,
            data: data.map(str::to_string),
        }
    }

    fn movie() -> Torrent {
        torrent(
            "abc",
            "Movie",
            Some(r#"{"TorrServer":{"Files":[{"path":"Movie/movie.mkv","length":1000,"id":1}]}}"#),
        )
    }

    #[test]
    fn empty_path_is_root() {
        assert!(matches!(resolve("/", &[]), Resolved::Root));
        assert!(matches!(resolve("", &[]), Resolved::Root));
        assert!(matches!(resolve("//", &[]), Resolved::Root));
    }

    #[test]
    fn single_segment_resolves_collection() {
        let torrents = vec![movie()];
        match resolve("/Movie", &torrents) {
            Resolved::Collection(t) => assert_eq!(t.hash, "abc"),
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[test]
    fn unknown_torrent_is_not_found() {
        let torrents = vec![movie()];
        match resolve("/Other", &torrents) {
            Resolved::NotFound(m) => assert_eq!(m, Missing::Torrent),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn file_resolves_by_flattened_name() {
        let torrents = vec![movie()];
        match resolve("/Movie/movie.mkv", &torrents) {
            Resolved::File { torrent, file } => {
                assert_eq!(torrent.hash, "abc");
                assert_eq!(file.id, 1);
            }
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn file_resolves_by_exact_nested_path() {
        let torrents = vec![movie()];
        match resolve("/Movie/Movie/movie.mkv", &torrents) {
            Resolved::File { file, .. } => assert_eq!(file.id, 1),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn unknown_file_is_not_found() {
        let torrents = vec![movie()];
        match resolve("/Movie/missing.mkv", &torrents) {
            Resolved::NotFound(m) => assert_eq!(m, Missing::File),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn exact_path_match_takes_priority_over_flattened() {
        let data = r#"{"TorrServer":{"Files":[
            {"path":"a/dup.mkv","length":1,"id":1},
            {"path":"dup.mkv","length":2,"id":2}
        ]}}"#;
        let torrents = vec![torrent("abc", "T", Some(data))];
        // "dup.mkv" matches entry 2 exactly, even though entry 1 flattens
        // to the same name and comes first.
        match resolve("/T/dup.mkv", &torrents) {
            Resolved::File { file, .. } => assert_eq!(file.id, 2),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn flattened_collision_picks_first_in_backend_order() {
        let data = r#"{"TorrServer":{"Files":[
            {"path":"a/dup.mkv","length":1,"id":1},
            {"path":"b/dup.mkv","length":2,"id":2}
        ]}}"#;
        let torrents = vec![torrent("abc", "T", Some(data))];
        match resolve("/T/dup.mkv", &torrents) {
            Resolved::File { file, .. } => assert_eq!(file.id, 1),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_display_names_resolve_to_first() {
        let torrents = vec![
            torrent("first", "Same", None),
            torrent("second", "Same", None),
        ];
        match resolve("/Same", &torrents) {
            Resolved::Collection(t) => assert_eq!(t.hash, "first"),
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[test]
    fn encoded_segments_are_decoded() {
        let torrents = vec![torrent("abc", "My Movie", None)];
        match resolve("/My%20Movie", &torrents) {
            Resolved::Collection(t) => assert_eq!(t.hash, "abc"),
            other => panic!("expected collection, got {other:?}"),
        }
    }
}
