//! Identifier codec for Content Network resources.
//!
//! Q-Music addresses tracks and playlists with underscore-delimited
//! identifiers whose final segment is always an opaque random code:
//!
//! - `qmusic_track_<title-slug>_<CODE>` - current track format
//! - `qmusic_song_<artist>_<title-slug>_<CODE>` - legacy track format
//! - `earbump_song_<title-slug>_<CODE>` - third-party legacy format
//! - `qmusic_playlist_<owner-slug>_<code>` - playlist format
//!
//! Minting happens at publish time; parsing recovers a best-effort title
//! (and artist, for the legacy song format) on read. Unknown namespaces
//! fail closed: the extraction functions return `None`, never panic.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix for track identifiers minted by this application.
pub const TRACK_PREFIX: &str = "qmusic_track_";
/// Prefix of the legacy artist-in-identifier track format.
pub const SONG_PREFIX: &str = "qmusic_song_";
/// Prefix of the third-party legacy track format.
pub const EARBUMP_PREFIX: &str = "earbump_song_";
/// Prefix for playlist identifiers.
pub const PLAYLIST_PREFIX: &str = "qmusic_playlist_";

/// Known identifier namespaces on the Content Network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// `qmusic_track_<title>_<CODE>`
    QmusicTrack,
    /// `qmusic_song_<artist>_<title>_<CODE>` (legacy)
    QmusicSong,
    /// `earbump_song_<title>_<CODE>` (third-party legacy)
    EarbumpSong,
    /// `qmusic_playlist_<owner>_<code>`
    QmusicPlaylist,
    /// Anything else. Extraction yields `None` for this namespace.
    Unknown,
}

impl Namespace {
    /// Classify an identifier by prefix match.
    pub fn classify(identifier: &str) -> Self {
        if identifier.starts_with(TRACK_PREFIX) {
            Self::QmusicTrack
        } else if identifier.starts_with(SONG_PREFIX) {
            Self::QmusicSong
        } else if identifier.starts_with(EARBUMP_PREFIX) {
            Self::EarbumpSong
        } else if identifier.starts_with(PLAYLIST_PREFIX) {
            Self::QmusicPlaylist
        } else {
            Self::Unknown
        }
    }

    /// Stable name of this namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QmusicTrack => "qmusic_track",
            Self::QmusicSong => "qmusic_song",
            Self::EarbumpSong => "earbump_song",
            Self::QmusicPlaylist => "qmusic_playlist",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier split into its namespace and raw underscore-delimited parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    pub namespace: Namespace,
    pub raw_parts: Vec<String>,
}

/// Split an identifier into its namespace and raw parts.
pub fn parse_identifier(identifier: &str) -> ParsedIdentifier {
    ParsedIdentifier {
        namespace: Namespace::classify(identifier),
        raw_parts: identifier.split('_').map(str::to_owned).collect(),
    }
}

/// Lowercase a string and replace every non-alphanumeric run with a single
/// underscore. Leading and trailing underscores are trimmed so that the
/// random-code suffix stays the only trailing segment.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_sep = true;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

const BASE36_UPPER: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE36_LOWER: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn random_code(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Mint a track identifier: `qmusic_track_<slug>_<CODE8>`.
///
/// The 8-character base36 code keeps the collision risk acceptable for a
/// network that offers no uniqueness guarantee anyway.
pub fn mint_track_identifier(title: &str) -> String {
    format!(
        "{}{}_{}",
        TRACK_PREFIX,
        slugify(title),
        random_code(BASE36_UPPER, 8)
    )
}

/// Mint a playlist identifier: `qmusic_playlist_<owner-slug>_<code>`.
///
/// The code is two concatenated base36 fragments (24 characters total) so
/// that independently published playlists stay distinct even under the
/// same owner name.
pub fn mint_playlist_identifier(owner: &str) -> String {
    let code = format!(
        "{}{}",
        random_code(BASE36_LOWER, 12),
        random_code(BASE36_LOWER, 12)
    );
    format!("{}{}_{}", PLAYLIST_PREFIX, slugify(owner), code)
}

/// Extract a human-readable title from an identifier.
///
/// Per-namespace rule: split on `_`, drop the fixed prefix tokens and the
/// trailing random code, join the remainder with spaces. Returns `None`
/// when the identifier has too few tokens or an unknown namespace.
pub fn extract_title(identifier: &str) -> Option<String> {
    let parts: Vec<&str> = identifier.split('_').collect();
    let middle = match Namespace::classify(identifier) {
        // qmusic_track_<title...>_CODE
        Namespace::QmusicTrack if parts.len() >= 4 => &parts[2..parts.len() - 1],
        // qmusic_song_<artist>_<title...>_CODE
        Namespace::QmusicSong if parts.len() >= 5 => &parts[3..parts.len() - 1],
        // earbump_song_<title...>_CODE
        Namespace::EarbumpSong if parts.len() >= 4 => &parts[2..parts.len() - 1],
        // qmusic_playlist_<name...>_code
        Namespace::QmusicPlaylist if parts.len() >= 4 => &parts[2..parts.len() - 1],
        _ => return None,
    };
    let title = middle.join(" ");
    if title.trim().is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Extract an artist from an identifier.
///
/// Only the legacy `qmusic_song_<artist>_<title>_<CODE>` format carries an
/// artist token (the third token). Every other namespace yields `None`.
pub fn extract_artist(identifier: &str) -> Option<String> {
    if Namespace::classify(identifier) != Namespace::QmusicSong {
        return None;
    }
    let parts: Vec<&str> = identifier.split('_').collect();
    if parts.len() >= 4 && !parts[2].is_empty() {
        Some(parts[2].to_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_namespaces() {
        assert_eq!(
            Namespace::classify("qmusic_track_hello_AB12CD34"),
            Namespace::QmusicTrack
        );
        assert_eq!(
            Namespace::classify("qmusic_song_johndoe_hello_XYZ789"),
            Namespace::QmusicSong
        );
        assert_eq!(
            Namespace::classify("earbump_song_hello_XYZ789"),
            Namespace::EarbumpSong
        );
        assert_eq!(
            Namespace::classify("qmusic_playlist_alice_x1y2z3"),
            Namespace::QmusicPlaylist
        );
        assert_eq!(Namespace::classify("random_junk"), Namespace::Unknown);
    }

    #[test]
    fn parse_identifier_exposes_raw_parts() {
        let parsed = parse_identifier("qmusic_playlist_alice_x1y2z3");
        assert_eq!(parsed.namespace, Namespace::QmusicPlaylist);
        assert_eq!(parsed.raw_parts, ["qmusic", "playlist", "alice", "x1y2z3"]);
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello_world");
        assert_eq!(slugify("Hello, World!"), "hello_world");
        assert_eq!(slugify("  spaced  out  "), "spaced_out");
        assert_eq!(slugify("already_slugged"), "already_slugged");
    }

    #[test]
    fn mint_track_identifier_shape() {
        let id = mint_track_identifier("Hello World");
        assert!(id.starts_with("qmusic_track_hello_world_"));
        let code = id.split('_').next_back().unwrap();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn mint_playlist_identifier_shape() {
        let id = mint_playlist_identifier("Alice");
        assert!(id.starts_with("qmusic_playlist_alice_"));
        let code = id.split('_').next_back().unwrap();
        assert!(code.len() >= 20);
    }

    #[test]
    fn track_title_round_trip() {
        let id = mint_track_identifier("Hello World");
        assert_eq!(extract_title(&id).as_deref(), Some("hello world"));
    }

    #[test]
    fn extract_title_track_format() {
        // spaces for underscores, random code dropped
        assert_eq!(
            extract_title("qmusic_track_hello_world_AB12CD34").as_deref(),
            Some("hello world")
        );
        assert_eq!(extract_artist("qmusic_track_hello_world_AB12CD34"), None);
    }

    #[test]
    fn extract_title_and_artist_legacy_song_format() {
        let id = "qmusic_song_johndoe_hello_world_XYZ789";
        assert_eq!(extract_artist(id).as_deref(), Some("johndoe"));
        assert_eq!(extract_title(id).as_deref(), Some("hello world"));
    }

    #[test]
    fn extract_title_earbump_format() {
        assert_eq!(
            extract_title("earbump_song_amazing_grace_DEF456").as_deref(),
            Some("amazing grace")
        );
        assert_eq!(extract_artist("earbump_song_amazing_grace_DEF456"), None);
    }

    #[test]
    fn extract_title_playlist_format() {
        assert_eq!(
            extract_title("qmusic_playlist_summer_hits_abc123").as_deref(),
            Some("summer hits")
        );
    }

    #[test]
    fn extraction_fails_closed() {
        // unknown namespace
        assert_eq!(extract_title("random_junk"), None);
        assert_eq!(extract_artist("random_junk"), None);
        // too few tokens: no title segment left
        assert_eq!(extract_title("qmusic_track_CODE"), None);
        // legacy song with artist but no title tokens
        assert_eq!(extract_title("qmusic_song_johndoe_XYZ789"), None);
        assert_eq!(
            extract_artist("qmusic_song_johndoe_XYZ789").as_deref(),
            Some("johndoe")
        );
        assert_eq!(extract_title(""), None);
    }
}
