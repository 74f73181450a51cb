//! Q-Music Metadata
//!
//! Best-effort `{title, artist}` recovery for raw network records.
//!
//! Records on the Content Network rarely carry clean metadata: older
//! publishers stuffed it into the description string, others only into the
//! identifier itself. This crate implements the priority chain used
//! everywhere a record is rendered:
//!
//! 1. Structured description (`title=...;author=...`), parsed tolerantly
//! 2. Title/artist derived from the identifier namespace
//! 3. A title hint carried by the record's network metadata, if any
//! 4. Owner name as title, `"Unknown Artist"` as artist
//!
//! The chain is total: it never fails and always produces both fields.
//!
//! # Example
//!
//! ```rust
//! use qmusic_metadata::{extract, RecordSource};
//!
//! let meta = extract(&RecordSource {
//!     owner: "alice",
//!     identifier: "qmusic_track_hello_world_AB12CD34",
//!     description: None,
//!     title_hint: None,
//! });
//! assert_eq!(meta.title, "hello world");
//! assert_eq!(meta.artist, "Unknown Artist");
//! ```

#![forbid(unsafe_code)]

mod description;

pub use description::{parse_description, DescriptionFields};

use qmusic_core::ids;
use serde::{Deserialize, Serialize};

/// Fallback artist when no tier of the chain produced one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// The raw fields of a network record that feed metadata extraction.
#[derive(Debug, Clone, Copy)]
pub struct RecordSource<'a> {
    /// Publishing account name.
    pub owner: &'a str,
    /// Resource identifier.
    pub identifier: &'a str,
    /// Free-form description, when the record carried one.
    pub description: Option<&'a str>,
    /// Title from the record's network metadata, when present.
    pub title_hint: Option<&'a str>,
}

/// Best-effort display metadata for a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
}

/// Run the extraction chain. Total: always yields a title and an artist.
pub fn extract(source: &RecordSource<'_>) -> TrackMetadata {
    let described = source
        .description
        .map(parse_description)
        .unwrap_or_default();

    let title = described
        .title
        .or_else(|| ids::extract_title(source.identifier))
        .or_else(|| source.title_hint.map(str::to_owned))
        .unwrap_or_else(|| source.owner.to_owned());

    let artist = described
        .artist
        .or_else(|| ids::extract_artist(source.identifier))
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_owned());

    TrackMetadata { title, artist }
}
