/// Playlist domain types
use crate::error::{QMusicError, Result};
use crate::types::{ResourceKey, ResourceRef, ServiceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a track inside a playlist.
///
/// Playlists store references, not full track records: the
/// `(owner, identifier, filename)` triple is enough to address the audio
/// resource on the network. Serializes with the wire field name `name` for
/// the owner, matching the published document shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Publishing account of the referenced track (wire name: `name`).
    #[serde(rename = "name")]
    pub owner: String,

    /// Identifier of the referenced track.
    pub identifier: String,

    /// Published filename of the audio resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Display title carried alongside the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PlaylistEntry {
    /// Whether two entries reference the same track (key equality on the
    /// `(owner, identifier)` pair).
    pub fn same_track(&self, other: &PlaylistEntry) -> bool {
        self.owner == other.owner && self.identifier == other.identifier
    }
}

/// The payload published as a playlist's content on the network.
///
/// Round-trip requirement: publishing this shape and fetching it back by
/// the same `(owner, identifier)` must reproduce an equivalent object,
/// with `songs` order preserved (insertion order is playback order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub name: String,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    pub songs: Vec<PlaylistEntry>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Ordered collection of track references, as listed/fetched from the
/// network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Publishing account.
    pub owner: String,

    /// `Playlist`, or `Document` when the record came from the legacy
    /// bucket.
    pub service: ServiceKind,

    /// Unique string within `(owner, service)`.
    pub identifier: String,

    /// User-supplied display name.
    pub name: String,

    /// User-supplied description.
    pub description: String,

    /// Ordered track references; insertion order is playback order.
    pub entries: Vec<PlaylistEntry>,

    /// Thumbnail image published under the same `(owner, identifier)`
    /// pair, when one exists.
    pub thumbnail: Option<ResourceRef>,

    /// Present only for locally-originated (optimistic) records.
    pub created_at: Option<DateTime<Utc>>,
}

impl Playlist {
    /// The de-duplication/lookup key for this playlist.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.owner, self.service, &self.identifier)
    }
}

/// User input for a playlist about to be published.
///
/// Validation runs before any network call: failures here never reach the
/// bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistDraft {
    pub name: String,
    pub description: String,
    pub entries: Vec<PlaylistEntry>,
}

impl PlaylistDraft {
    /// Check the draft for required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(QMusicError::invalid_input("Playlist name is required"));
        }
        if self.entries.is_empty() {
            return Err(QMusicError::invalid_input(
                "At least one track must be selected",
            ));
        }
        Ok(())
    }

    /// Filename the playlist document is published under.
    pub fn filename(&self) -> String {
        format!("{}.json", self.name.replace(' ', "_"))
    }

    /// Build the wire document for this draft.
    pub fn into_document(self, created_by: &str, created_at: DateTime<Utc>) -> PlaylistDocument {
        PlaylistDocument {
            name: self.name,
            created_by: created_by.to_owned(),
            songs: self.entries,
            created_at,
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(owner: &str, identifier: &str) -> PlaylistEntry {
        PlaylistEntry {
            owner: owner.to_owned(),
            identifier: identifier.to_owned(),
            filename: Some("song.mp3".to_owned()),
            title: Some("Song".to_owned()),
        }
    }

    #[test]
    fn document_round_trip_preserves_order_and_fields() {
        let doc = PlaylistDocument {
            name: "Summer Hits".to_owned(),
            created_by: "alice".to_owned(),
            songs: vec![entry("alice", "id_one"), entry("bob", "id_two")],
            created_at: Utc::now(),
            description: Some("Best summer tracks".to_owned()),
        };

        let json = serde_json::to_value(&doc).unwrap();
        let back: PlaylistDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.songs[0].identifier, "id_one");
        assert_eq!(back.songs[1].identifier, "id_two");
    }

    #[test]
    fn document_uses_wire_field_names() {
        let doc = PlaylistDocument {
            name: "P".to_owned(),
            created_by: "alice".to_owned(),
            songs: vec![entry("alice", "id")],
            created_at: Utc::now(),
            description: None,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("createdBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
        assert_eq!(json["songs"][0]["name"], "alice");
    }

    #[test]
    fn draft_validation() {
        let mut draft = PlaylistDraft {
            name: "My List".to_owned(),
            description: String::new(),
            entries: vec![entry("alice", "id")],
        };
        assert!(draft.validate().is_ok());

        draft.name = "   ".to_owned();
        assert!(matches!(
            draft.validate(),
            Err(QMusicError::InvalidInput(_))
        ));

        draft.name = "My List".to_owned();
        draft.entries.clear();
        assert!(matches!(
            draft.validate(),
            Err(QMusicError::InvalidInput(_))
        ));
    }

    #[test]
    fn draft_filename_replaces_spaces() {
        let draft = PlaylistDraft {
            name: "Summer Hits".to_owned(),
            ..PlaylistDraft::default()
        };
        assert_eq!(draft.filename(), "Summer_Hits.json");
    }

    #[test]
    fn same_track_ignores_title_and_filename() {
        let a = entry("alice", "id");
        let mut b = entry("alice", "id");
        b.title = Some("Other".to_owned());
        b.filename = None;
        assert!(a.same_track(&b));
        assert!(!a.same_track(&entry("bob", "id")));
    }
}
