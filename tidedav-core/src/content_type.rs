//! Fixed extension-to-MIME table.
//!
//! The table is part of the wire contract shared between PROPFIND property
//! rendering and the streaming proxy's fallback, so it is spelled out here
//! rather than delegated to a guessing library.

/// Returns the MIME type for a file name based on its extension.
///
/// Matching is case-insensitive; unknown extensions map to
/// `application/octet-stream`.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        // Video
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "m4v" => "video/x-m4v",
        "ts" => "video/mp2t",
        // Audio
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "wma" => "audio/x-ms-wma",
        // Subtitles and text
        "srt" => "application/x-subrip",
        "ass" => "text/x-ssa",
        "ssa" => "text/x-ssa",
        "sub" => "text/x-microdvd",
        "vtt" => "text/vtt",
        "idx" => "application/x-idx",
        "nfo" => "text/plain",
        "txt" => "text/plain",
        // Images
        "jpg" => "image/jpeg",
        "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_video_extensions() {
        assert_eq!(content_type_for("movie.mkv"), "video/x-matroska");
        assert_eq!(content_type_for("movie.mp4"), "video/mp4");
        assert_eq!(content_type_for("show.ts"), "video/mp2t");
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(content_type_for("MOVIE.MKV"), "video/x-matroska");
        assert_eq!(content_type_for("Track.Mp3"), "audio/mpeg");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for("file.xyz"), "application/octet-stream");
        assert_eq!(content_type_for("noextension"), "application/octet-stream");
    }

    #[test]
    fn subtitle_and_image_extensions() {
        assert_eq!(content_type_for("subs.srt"), "application/x-subrip");
        assert_eq!(content_type_for("cover.jpg"), "image/jpeg");
        assert_eq!(content_type_for("readme.nfo"), "text/plain");
    }
}
