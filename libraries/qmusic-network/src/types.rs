//! Wire-adjacent types for the source adapter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record as search/list responses return it, before normalization.
///
/// Responses are heterogeneous across buckets and publisher generations;
/// every field beyond the addressing triple is optional and unknown
/// fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Publishing account (the network calls the owner `name`).
    pub name: String,
    pub identifier: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    /// Creation time in epoch milliseconds, when reported.
    #[serde(default)]
    pub created: Option<i64>,
    /// Duration in seconds, when reported.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
}

/// Nested metadata object some records carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawRecord {
    /// The description to feed the metadata extractor: the record-level
    /// field, else the nested metadata one.
    pub fn best_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.description.as_deref()))
    }

    /// The title hint to feed the metadata extractor.
    pub fn title_hint(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.title.as_deref()))
    }

    /// Creation time as a timestamp, when the record reported one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// The publishing identity threaded through every write operation.
///
/// Writes take this explicitly; there is no ambient "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name resources are published under.
    pub name: String,
    /// Account address, when known.
    pub address: Option<String>,
    /// Account public key, when known.
    pub public_key: Option<String>,
}

impl Identity {
    /// Identity known only by display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            public_key: None,
        }
    }
}

/// A cover/thumbnail image to publish alongside a resource, under the
/// same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// An audio file upload with its user-supplied metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub title: String,
    pub artist: String,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub thumbnail: Option<ThumbnailUpload>,
}

/// Outcome of the optional thumbnail publish that follows a successful
/// primary publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailStatus {
    /// Thumbnail accepted by the network.
    Published,
    /// Thumbnail publish failed; the primary resource is already live and
    /// is not rolled back (the network has no transactions).
    Failed(String),
}

/// What a successful publish operation returns to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Identifier the resource was published under (minted by the adapter
    /// for creates, caller-supplied for updates).
    pub identifier: String,
    /// Filename of the published primary resource.
    pub filename: String,
    /// Outcome of the trailing thumbnail publish, when one was attached.
    pub thumbnail: Option<ThumbnailStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_tolerates_sparse_input() {
        let record: RawRecord = serde_json::from_value(serde_json::json!({
            "name": "alice",
            "identifier": "qmusic_track_hello_AB12CD34",
            "unexpected_field": 42
        }))
        .unwrap();
        assert_eq!(record.name, "alice");
        assert!(record.best_description().is_none());
        assert!(record.created_at().is_none());
    }

    #[test]
    fn nested_metadata_backfills_description_and_title() {
        let record: RawRecord = serde_json::from_value(serde_json::json!({
            "name": "alice",
            "identifier": "id",
            "metadata": {"title": "Nested", "description": "title=Nested"}
        }))
        .unwrap();
        assert_eq!(record.title_hint(), Some("Nested"));
        assert_eq!(record.best_description(), Some("title=Nested"));
    }

    #[test]
    fn created_at_parses_epoch_millis() {
        let record: RawRecord = serde_json::from_value(serde_json::json!({
            "name": "a", "identifier": "i", "created": 1_700_000_000_000_i64
        }))
        .unwrap();
        let created = record.created_at().unwrap();
        assert_eq!(created.timestamp(), 1_700_000_000);
    }
}
