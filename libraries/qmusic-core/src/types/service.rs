/// Content Network service buckets
use serde::{Deserialize, Serialize};

/// Logical bucket a resource is published under on the Content Network.
///
/// `Document` is the legacy bucket some early playlists were published to;
/// playlist reads fall back to it when the `Playlist` bucket comes up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    /// Published audio files
    Audio,
    /// Playlist documents
    Playlist,
    /// Cover/thumbnail images, keyed by the same identifier as their resource
    Thumbnail,
    /// Legacy bucket used by early playlist publishes
    Document,
}

impl ServiceKind {
    /// Wire name of this bucket as the network expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Audio => "AUDIO",
            ServiceKind::Playlist => "PLAYLIST",
            ServiceKind::Thumbnail => "THUMBNAIL",
            ServiceKind::Document => "DOCUMENT",
        }
    }

    /// Parse a wire name back into a bucket.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AUDIO" => Some(ServiceKind::Audio),
            "PLAYLIST" => Some(ServiceKind::Playlist),
            "THUMBNAIL" => Some(ServiceKind::Thumbnail),
            "DOCUMENT" => Some(ServiceKind::Document),
            _ => None,
        }
    }

    /// The legacy bucket to retry against when a read from this bucket
    /// comes up empty, if any.
    pub fn legacy_fallback(&self) -> Option<ServiceKind> {
        match self {
            ServiceKind::Playlist => Some(ServiceKind::Document),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trip() {
        for kind in [
            ServiceKind::Audio,
            ServiceKind::Playlist,
            ServiceKind::Thumbnail,
            ServiceKind::Document,
        ] {
            assert_eq!(ServiceKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ServiceKind::from_str("WEBSITE"), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ServiceKind::Playlist).unwrap();
        assert_eq!(json, "\"PLAYLIST\"");
        let kind: ServiceKind = serde_json::from_str("\"AUDIO\"").unwrap();
        assert_eq!(kind, ServiceKind::Audio);
    }

    #[test]
    fn only_playlist_has_a_fallback_bucket() {
        assert_eq!(
            ServiceKind::Playlist.legacy_fallback(),
            Some(ServiceKind::Document)
        );
        assert_eq!(ServiceKind::Audio.legacy_fallback(), None);
        assert_eq!(ServiceKind::Document.legacy_fallback(), None);
    }
}
