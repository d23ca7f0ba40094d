//! Source string classification.
//!
//! Maps arbitrary host-provided source strings (share links, watch URLs,
//! embed URLs, legacy path forms) to a playable identifier. Pure string
//! matching, no network access.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use regex::Regex;

/// Video identifiers are exactly this long
const VIDEO_ID_LEN: usize = 11;

/// Matches the accepted single-video URL shapes. The leading greedy anchor
/// means the last marker in the string wins when several occur.
static VIDEO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)")
        .expect("video pattern is valid")
});

/// Matches a playlist query parameter anywhere in the string
static PLAYLIST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]list=([^#&?]+)").expect("playlist pattern is valid"));

/// A source string classified into something the SDK can play
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MediaSource {
    /// Single video, identified by its 11-character id
    Video(String),
    /// Playlist, identified by its list id
    Playlist(String),
}

impl MediaSource {
    /// The extracted identifier
    pub fn id(&self) -> &str {
        match self {
            MediaSource::Video(id) => id,
            MediaSource::Playlist(id) => id,
        }
    }

    pub fn is_playlist(&self) -> bool {
        matches!(self, MediaSource::Playlist(_))
    }
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::Video(id) => write!(f, "video:{}", id),
            MediaSource::Playlist(id) => write!(f, "playlist:{}", id),
        }
    }
}

/// Classify a source string.
///
/// A playlist parameter takes precedence over a video match when a string
/// contains both. A video match only counts when the extracted token is
/// exactly 11 characters.
pub fn resolve(source: &str) -> Option<MediaSource> {
    if let Some(captures) = PLAYLIST_PATTERN.captures(source) {
        return Some(MediaSource::Playlist(captures[1].to_string()));
    }

    if let Some(captures) = VIDEO_PATTERN.captures(source) {
        let id = &captures[2];
        if id.len() == VIDEO_ID_LEN {
            return Some(MediaSource::Video(id.to_string()));
        }
    }

    None
}

/// True when [`resolve`] classifies the string as playable
pub fn can_play(source: &str) -> bool {
    resolve(source).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_short_link() {
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_resolves_watch_url() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_resolves_ampersand_v_parameter() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_resolves_embed_url() {
        assert_eq!(
            resolve("https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_resolves_legacy_path_forms() {
        assert_eq!(
            resolve("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
        assert_eq!(
            resolve("https://www.youtube.com/u/1/dQw4w9WgXcQ"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_all_shapes_agree_on_the_same_token() {
        let shapes = [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
        ];
        for shape in shapes {
            assert_eq!(
                resolve(shape),
                Some(MediaSource::Video("dQw4w9WgXcQ".to_string())),
                "shape: {}",
                shape
            );
        }
    }

    #[test]
    fn test_trailing_fragment_is_stripped() {
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ#t=42"),
            Some(MediaSource::Video("dQw4w9WgXcQ".to_string()))
        );
    }

    #[test]
    fn test_playlist_parameter_resolves() {
        assert_eq!(
            resolve("https://www.youtube.com/playlist?list=PL0eXqHs5XaGE"),
            Some(MediaSource::Playlist("PL0eXqHs5XaGE".to_string()))
        );
    }

    #[test]
    fn test_playlist_takes_precedence_over_video() {
        assert_eq!(
            resolve("https://x/watch?v=dQw4w9WgXcQ&list=PL123"),
            Some(MediaSource::Playlist("PL123".to_string()))
        );
    }

    #[test]
    fn test_wrong_length_token_is_rejected() {
        assert_eq!(resolve("https://youtu.be/shortid"), None);
        assert_eq!(resolve("https://youtu.be/twelve_chars"), None);
    }

    #[test]
    fn test_unrecognized_inputs_resolve_to_none() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("not a url"), None);
        assert_eq!(resolve("https://example.com/video.mp4"), None);
        assert_eq!(resolve("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_can_play_agrees_with_resolve() {
        let inputs = [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://x/watch?v=dQw4w9WgXcQ&list=PL123",
            "https://youtu.be/shortid",
            "https://example.com/video.mp4",
            "not a url",
            "",
        ];
        for input in inputs {
            assert_eq!(can_play(input), resolve(input).is_some(), "input: {}", input);
        }
    }

    #[test]
    fn test_source_serializes_with_kind_tag() {
        let json = serde_json::to_value(MediaSource::Video("dQw4w9WgXcQ".to_string())).unwrap();
        assert_eq!(json["kind"], "video");
        assert_eq!(json["id"], "dQw4w9WgXcQ");

        let json = serde_json::to_value(MediaSource::Playlist("PL123".to_string())).unwrap();
        assert_eq!(json["kind"], "playlist");
    }
}
