/// Track domain type
use crate::types::ServiceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// De-duplication/lookup key for a published resource:
/// `<owner>_<SERVICE>_<identifier>`.
///
/// Unique per reconciled list. Owner names are not globally unique on the
/// network, so the key always carries all three components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Build a key from its components.
    pub fn new(owner: &str, service: ServiceKind, identifier: &str) -> Self {
        Self(format!("{}_{}_{}", owner, service.as_str(), identifier))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pointer to a resource published under an `(owner, identifier)` pair,
/// e.g. the thumbnail that shares its identifier with a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub owner: String,
    pub identifier: String,
}

/// Audio resource record, normalized from whatever shape the network
/// returned it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Display name of the publishing account. Acts as a namespace, not
    /// guaranteed unique.
    pub owner: String,

    /// Bucket the resource lives in (`Audio`, or `Document` for legacy
    /// publishes).
    pub service: ServiceKind,

    /// Unique string within `(owner, service)`.
    pub identifier: String,

    /// Best-effort title. Derived; worst case the owner name.
    pub title: String,

    /// Best-effort artist, when one could be derived.
    pub artist: Option<String>,

    /// Duration in seconds, when the source reported one.
    pub duration_secs: Option<u64>,

    /// Published filename, when known.
    pub filename: Option<String>,

    /// Present only for locally-originated (optimistic) records.
    pub created_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a track with minimal fields; title defaults to the owner name
    /// until the metadata extractor enriches it.
    pub fn new(
        owner: impl Into<String>,
        service: ServiceKind,
        identifier: impl Into<String>,
    ) -> Self {
        let owner = owner.into();
        Self {
            title: owner.clone(),
            owner,
            service,
            identifier: identifier.into(),
            artist: None,
            duration_secs: None,
            filename: None,
            created_at: None,
        }
    }

    /// The de-duplication/lookup key for this track.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.owner, self.service, &self.identifier)
    }

    /// Age of this record relative to `now`, when it carries a local
    /// creation timestamp.
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.created_at.map(|created| now - created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        let track = Track::new("alice", ServiceKind::Audio, "qmusic_track_hello_AB12CD34");
        assert_eq!(
            track.key().as_str(),
            "alice_AUDIO_qmusic_track_hello_AB12CD34"
        );
    }

    #[test]
    fn new_track_defaults_title_to_owner() {
        let track = Track::new("bob", ServiceKind::Audio, "id");
        assert_eq!(track.title, "bob");
        assert!(track.artist.is_none());
        assert!(track.created_at.is_none());
    }

    #[test]
    fn age_requires_created_at() {
        let now = Utc::now();
        let mut track = Track::new("bob", ServiceKind::Audio, "id");
        assert!(track.age(now).is_none());

        track.created_at = Some(now - chrono::Duration::seconds(30));
        assert_eq!(track.age(now), Some(chrono::Duration::seconds(30)));
    }
}
