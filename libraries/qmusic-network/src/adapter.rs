//! The source adapter: typed operations over the host bridge.
//!
//! Fetches candidate records from the Content Network, normalizes the
//! heterogeneous responses into `Track`/`Playlist`, and applies the
//! per-bucket fallback rules:
//!
//! - playlist reads retry once against the legacy `DOCUMENT` bucket when
//!   the `PLAYLIST` bucket comes up empty or erroring;
//! - with no usable bridge, reads degrade to the deterministic mock
//!   dataset while writes fail fast with a distinguished error.
//!
//! The bridge itself has no timeout, so every round trip here is wrapped
//! in one; a timeout surfaces as a retryable transport error.

use crate::bridge::{Bridge, BridgeRequest, NoBridge, ResourceSpec};
use crate::error::{NetworkError, Result};
use crate::mock;
use crate::types::{
    AudioUpload, Identity, PublishReceipt, RawRecord, ThumbnailStatus, ThumbnailUpload,
};
use base64::Engine;
use chrono::Utc;
use qmusic_core::ids::{self, Namespace};
use qmusic_core::{
    Playlist, PlaylistDocument, PlaylistDraft, PlaylistEntry, QMusicError, ResourceRef,
    ServiceKind, Track,
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Search query matching every identifier this app publishes or reads.
pub const TRACK_QUERY: &str = "qmusic_";
/// Search query matching playlist identifiers.
pub const PLAYLIST_QUERY: &str = "qmusic_playlist_";

/// Tunable adapter parameters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdapterConfig {
    /// Deadline for a single bridge round trip.
    pub request_timeout: Duration,
    /// Default page size for listings.
    pub default_limit: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            default_limit: 20,
        }
    }
}

/// Typed front door to the Content Network.
pub struct SourceAdapter<B> {
    bridge: B,
    config: AdapterConfig,
}

impl SourceAdapter<NoBridge> {
    /// Adapter for standalone operation: reads serve the mock dataset,
    /// writes fail with [`NetworkError::BridgeUnavailable`].
    pub fn detached() -> Self {
        Self::new(NoBridge)
    }
}

impl<B: Bridge> SourceAdapter<B> {
    /// Adapter over a live host bridge.
    pub fn new(bridge: B) -> Self {
        Self::with_config(bridge, AdapterConfig::default())
    }

    /// Adapter with explicit tuning.
    pub fn with_config(bridge: B, config: AdapterConfig) -> Self {
        Self { bridge, config }
    }

    /// Current tuning.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// One timeout-wrapped bridge round trip.
    async fn call(&self, request: BridgeRequest) -> Result<Value> {
        debug!(action = ?request.action, "bridge request");
        match tokio::time::timeout(self.config.request_timeout, self.bridge.request(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout(self.config.request_timeout)),
        }
    }

    async fn search(
        &self,
        service: ServiceKind,
        query: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RawRecord>> {
        let response = self
            .call(BridgeRequest::search(service, query, limit, offset))
            .await?;
        let Value::Array(items) = response else {
            return Err(NetworkError::Malformed(format!(
                "search response for {service} is not an array"
            )));
        };
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<RawRecord>(item) {
                Ok(record) => records.push(record),
                Err(err) => warn!(%err, "skipping unreadable search record"),
            }
        }
        Ok(records)
    }

    fn normalize_track(&self, requested: ServiceKind, record: &RawRecord) -> Track {
        let meta = qmusic_metadata::extract(&qmusic_metadata::RecordSource {
            owner: &record.name,
            identifier: &record.identifier,
            description: record.best_description(),
            title_hint: record.title_hint(),
        });
        let service = record
            .service
            .as_deref()
            .and_then(ServiceKind::from_str)
            .unwrap_or(requested);
        Track {
            owner: record.name.clone(),
            service,
            identifier: record.identifier.clone(),
            title: meta.title,
            artist: Some(meta.artist),
            duration_secs: record.duration,
            filename: record.filename.clone(),
            created_at: record.created_at(),
        }
    }

    /// Most recent audio tracks across the network, normalized and
    /// enriched. Only identifiers in a known namespace are kept. Degrades
    /// to the mock dataset when the bridge is unusable.
    pub async fn list_recent_tracks(&self, limit: u64, offset: u64) -> Vec<Track> {
        match self
            .search(ServiceKind::Audio, TRACK_QUERY, limit, offset)
            .await
        {
            Ok(records) => records
                .iter()
                .filter(|r| Namespace::classify(&r.identifier) != Namespace::Unknown)
                .map(|r| self.normalize_track(ServiceKind::Audio, r))
                .take(limit as usize)
                .collect(),
            Err(err) => {
                warn!(%err, "track search failed, serving mock dataset");
                mock::mock_tracks()
            }
        }
    }

    fn summarize_playlist(&self, service: ServiceKind, record: &RawRecord) -> Playlist {
        let name = record
            .title_hint()
            .map(str::to_owned)
            .or_else(|| ids::extract_title(&record.identifier))
            .or_else(|| {
                record
                    .filename
                    .as_deref()
                    .map(|f| f.trim_end_matches(".json").to_owned())
            })
            .unwrap_or_else(|| "Unnamed Playlist".to_owned());
        Playlist {
            owner: record.name.clone(),
            service,
            identifier: record.identifier.clone(),
            name,
            description: record.best_description().unwrap_or_default().to_owned(),
            entries: Vec::new(),
            thumbnail: Some(ResourceRef {
                owner: record.name.clone(),
                identifier: record.identifier.clone(),
            }),
            created_at: record.created_at(),
        }
    }

    /// Most recent playlists. Tries the `PLAYLIST` bucket, retries once
    /// against the legacy `DOCUMENT` bucket with identical parameters on
    /// an empty or erroring result, and degrades to the mock dataset when
    /// both fail. Entries stay empty until a playlist is fetched
    /// individually.
    pub async fn list_recent_playlists(&self, limit: u64, offset: u64) -> Vec<Playlist> {
        let primary = ServiceKind::Playlist;
        match self.search(primary, PLAYLIST_QUERY, limit, offset).await {
            Ok(records) if !records.is_empty() => {
                return records
                    .iter()
                    .filter(|r| {
                        Namespace::classify(&r.identifier) == Namespace::QmusicPlaylist
                    })
                    .map(|r| self.summarize_playlist(primary, r))
                    .collect();
            }
            Ok(_) => debug!("PLAYLIST bucket empty, retrying DOCUMENT"),
            Err(err) => warn!(%err, "PLAYLIST search failed, retrying DOCUMENT"),
        }

        let fallback = ServiceKind::Document;
        match self.search(fallback, PLAYLIST_QUERY, limit, offset).await {
            Ok(records) => records
                .iter()
                .filter(|r| Namespace::classify(&r.identifier) == Namespace::QmusicPlaylist)
                .map(|r| self.summarize_playlist(fallback, r))
                .collect(),
            Err(err) => {
                warn!(%err, "DOCUMENT fallback failed, serving mock dataset");
                mock::mock_playlists()
            }
        }
    }

    fn parse_playlist_payload(
        owner: &str,
        service: ServiceKind,
        identifier: &str,
        payload: &Value,
    ) -> Option<Playlist> {
        let object = payload.as_object()?;
        // Older publishers stored the entry array under `tracks`; the
        // canonical field is `songs`. A payload with neither is treated
        // as not-found so the caller can try the fallback bucket.
        let raw_entries = object
            .get("songs")
            .or_else(|| object.get("tracks"))?
            .as_array()?;
        let entries: Vec<PlaylistEntry> = raw_entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect();

        let string_field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_owned)
        };
        let name = string_field("name")
            .or_else(|| string_field("title"))
            .or_else(|| ids::extract_title(identifier))
            .unwrap_or_else(|| "Unnamed Playlist".to_owned());
        let created_at = string_field("createdAt")
            .and_then(|s| s.parse::<chrono::DateTime<Utc>>().ok());

        Some(Playlist {
            owner: owner.to_owned(),
            service,
            identifier: identifier.to_owned(),
            name,
            description: string_field("description").unwrap_or_default(),
            entries,
            thumbnail: Some(ResourceRef {
                owner: owner.to_owned(),
                identifier: identifier.to_owned(),
            }),
            created_at,
        })
    }

    /// Fetch one playlist by `(owner, identifier)`.
    ///
    /// A payload without a track array counts as not-found and triggers
    /// the `DOCUMENT` fallback. Returns `Ok(None)` when neither bucket
    /// has it; transport failures other than bridge absence propagate so
    /// the caller can retry.
    pub async fn fetch_playlist(&self, owner: &str, identifier: &str) -> Result<Option<Playlist>> {
        let mut last_err = None;
        for service in [ServiceKind::Playlist, ServiceKind::Document] {
            match self
                .call(BridgeRequest::fetch(service, owner, identifier))
                .await
            {
                Ok(payload) => {
                    if let Some(playlist) =
                        Self::parse_playlist_payload(owner, service, identifier, &payload)
                    {
                        return Ok(Some(playlist));
                    }
                    debug!(%identifier, %service, "payload lacks a track array, trying fallback");
                    last_err = None;
                }
                Err(NetworkError::BridgeUnavailable) => {
                    warn!(%identifier, "bridge unavailable, serving mock playlist");
                    return Ok(Some(mock::mock_playlist(owner, identifier)));
                }
                Err(err) => {
                    warn!(%err, %identifier, %service, "playlist fetch failed");
                    last_err = Some(err);
                }
            }
        }
        match last_err {
            // A hung or failing transport on both buckets is worth a
            // retry by the caller; a clean miss is just not-found.
            Some(err) if err.is_retryable() => Err(err),
            _ => Ok(None),
        }
    }

    /// Fetch one track record by `(owner, identifier)`. Returns
    /// `Ok(None)` on not-found.
    pub async fn fetch_track(&self, owner: &str, identifier: &str) -> Result<Option<Track>> {
        match self
            .call(BridgeRequest::fetch(ServiceKind::Audio, owner, identifier))
            .await
        {
            Ok(Value::Null) => Ok(None),
            Ok(_) => {
                let meta = qmusic_metadata::extract(&qmusic_metadata::RecordSource {
                    owner,
                    identifier,
                    description: None,
                    title_hint: None,
                });
                Ok(Some(Track {
                    owner: owner.to_owned(),
                    service: ServiceKind::Audio,
                    identifier: identifier.to_owned(),
                    title: meta.title,
                    artist: Some(meta.artist),
                    duration_secs: None,
                    filename: None,
                    created_at: None,
                }))
            }
            Err(NetworkError::BridgeUnavailable) => Ok(mock::mock_tracks()
                .into_iter()
                .find(|t| t.identifier == identifier)),
            Err(err) if err.is_retryable() => Err(err),
            Err(err) => {
                warn!(%err, %identifier, "track fetch failed");
                Ok(None)
            }
        }
    }

    /// Everything published by `owner`, as raw records.
    pub async fn list_owned(&self, owner: &str) -> Result<Vec<RawRecord>> {
        let response = self.call(BridgeRequest::list(owner)).await?;
        let Value::Array(items) = response else {
            return Err(NetworkError::Malformed(
                "list response is not an array".to_owned(),
            ));
        };
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Playlists published by `owner` (summaries, entries empty).
    pub async fn list_owned_playlists(&self, owner: &str) -> Result<Vec<Playlist>> {
        let records = self.list_owned(owner).await?;
        Ok(records
            .iter()
            .filter(|r| r.service.as_deref() == Some("PLAYLIST"))
            .map(|r| self.summarize_playlist(ServiceKind::Playlist, r))
            .collect())
    }

    /// Interpret a publish response: `true` (or an array of transaction
    /// objects carrying signatures) means accepted; any other well-formed
    /// payload is a rejection carrying the underlying reason.
    fn check_publish_response(response: Value) -> Result<()> {
        match &response {
            Value::Bool(true) => Ok(()),
            Value::Array(items)
                if items
                    .first()
                    .and_then(|i| i.get("signature"))
                    .is_some() =>
            {
                Ok(())
            }
            _ => Err(NetworkError::Rejected(response)),
        }
    }

    fn require_identity(identity: &Identity) -> Result<()> {
        if identity.name.trim().is_empty() {
            return Err(QMusicError::invalid_input(
                "a logged-in identity is required to publish",
            )
            .into());
        }
        Ok(())
    }

    /// Publish the thumbnail that trails a successful primary publish.
    /// Never rolls the primary back; the outcome lands in the receipt.
    async fn publish_thumbnail(
        &self,
        owner: &str,
        identifier: &str,
        thumbnail: ThumbnailUpload,
    ) -> ThumbnailStatus {
        let data64 = base64::engine::general_purpose::STANDARD.encode(&thumbnail.bytes);
        let request = BridgeRequest::publish_base64(
            ServiceKind::Thumbnail,
            owner,
            identifier,
            data64,
            &thumbnail.filename,
        );
        match self.call(request).await.and_then(Self::check_publish_response) {
            Ok(()) => ThumbnailStatus::Published,
            Err(err) => {
                warn!(%err, %identifier, "thumbnail publish failed");
                ThumbnailStatus::Failed(err.to_string())
            }
        }
    }

    /// Create and publish a new playlist.
    ///
    /// Validates the draft before any network traffic, mints the
    /// identifier, publishes the structured document, then publishes the
    /// thumbnail (same identifier) strictly after the primary publish
    /// succeeded. Returns the optimistic record for immediate head
    /// insertion alongside the receipt.
    pub async fn publish_playlist(
        &self,
        identity: &Identity,
        draft: PlaylistDraft,
        thumbnail: Option<ThumbnailUpload>,
    ) -> Result<(Playlist, PublishReceipt)> {
        Self::require_identity(identity)?;
        draft.validate()?;

        let identifier = ids::mint_playlist_identifier(&identity.name);
        let filename = draft.filename();
        let created_at = Utc::now();
        let document = draft.into_document(&identity.name, created_at);
        let description = document.description.clone().unwrap_or_default();

        let request = BridgeRequest::publish(
            ServiceKind::Playlist,
            &identity.name,
            &identifier,
            serde_json::to_value(&document).map_err(QMusicError::from)?,
            &filename,
        )
        .with_listing(&document.name, &description);

        let response = self.call(request).await?;
        Self::check_publish_response(response)?;
        info!(%identifier, name = %document.name, "playlist published");

        let thumbnail_status = match thumbnail {
            Some(upload) => Some(
                self.publish_thumbnail(&identity.name, &identifier, upload)
                    .await,
            ),
            None => None,
        };

        let playlist = Playlist {
            owner: identity.name.clone(),
            service: ServiceKind::Playlist,
            identifier: identifier.clone(),
            name: document.name,
            description,
            entries: document.songs,
            thumbnail: matches!(thumbnail_status, Some(ThumbnailStatus::Published)).then(|| {
                ResourceRef {
                    owner: identity.name.clone(),
                    identifier: identifier.clone(),
                }
            }),
            created_at: Some(created_at),
        };
        let receipt = PublishReceipt {
            identifier,
            filename,
            thumbnail: thumbnail_status,
        };
        Ok((playlist, receipt))
    }

    /// Republish an existing playlist under the same identifier.
    /// "Updating" on an immutable-content network is a full republish.
    pub async fn update_playlist(
        &self,
        identity: &Identity,
        identifier: &str,
        document: &PlaylistDocument,
    ) -> Result<PublishReceipt> {
        Self::require_identity(identity)?;
        let filename = format!("{}.json", document.name.replace(' ', "_"));
        let request = BridgeRequest::publish(
            ServiceKind::Playlist,
            &identity.name,
            identifier,
            serde_json::to_value(document).map_err(QMusicError::from)?,
            &filename,
        )
        .with_listing(
            &document.name,
            document.description.as_deref().unwrap_or_default(),
        );
        let response = self.call(request).await?;
        Self::check_publish_response(response)?;
        info!(%identifier, "playlist updated");
        Ok(PublishReceipt {
            identifier: identifier.to_owned(),
            filename,
            thumbnail: None,
        })
    }

    fn document_from(playlist: &Playlist) -> PlaylistDocument {
        PlaylistDocument {
            name: playlist.name.clone(),
            created_by: playlist.owner.clone(),
            songs: playlist.entries.clone(),
            created_at: playlist.created_at.unwrap_or_else(Utc::now),
            description: if playlist.description.is_empty() {
                None
            } else {
                Some(playlist.description.clone())
            },
        }
    }

    /// Append a track to one of the identity's playlists.
    ///
    /// Adding a track already present (key equality on the
    /// `(owner, identifier)` pair) is a rejected operation, not a silent
    /// no-op.
    pub async fn add_track(
        &self,
        identity: &Identity,
        playlist_identifier: &str,
        entry: PlaylistEntry,
    ) -> Result<Playlist> {
        Self::require_identity(identity)?;
        let mut playlist = self
            .fetch_playlist(&identity.name, playlist_identifier)
            .await?
            .ok_or_else(|| QMusicError::not_found("Playlist", playlist_identifier))?;

        if playlist.entries.iter().any(|e| e.same_track(&entry)) {
            return Err(QMusicError::duplicate(format!(
                "track {} is already in the playlist",
                entry.identifier
            ))
            .into());
        }

        playlist.entries.push(entry);
        let document = Self::document_from(&playlist);
        self.update_playlist(identity, playlist_identifier, &document)
            .await?;
        Ok(playlist)
    }

    /// Remove a track from one of the identity's playlists.
    pub async fn remove_track(
        &self,
        identity: &Identity,
        playlist_identifier: &str,
        track_identifier: &str,
    ) -> Result<Playlist> {
        Self::require_identity(identity)?;
        let mut playlist = self
            .fetch_playlist(&identity.name, playlist_identifier)
            .await?
            .ok_or_else(|| QMusicError::not_found("Playlist", playlist_identifier))?;

        playlist.entries.retain(|e| e.identifier != track_identifier);
        let document = Self::document_from(&playlist);
        self.update_playlist(identity, playlist_identifier, &document)
            .await?;
        Ok(playlist)
    }

    /// Publish an audio track (and its optional cover) in a single
    /// multi-resource request. Returns the minted identifier.
    pub async fn publish_audio(
        &self,
        identity: &Identity,
        upload: AudioUpload,
    ) -> Result<PublishReceipt> {
        Self::require_identity(identity)?;
        if upload.title.trim().is_empty() {
            return Err(QMusicError::invalid_input("Track title is required").into());
        }

        let identifier = ids::mint_track_identifier(&upload.title);
        let description = format!("title={};artist={}", upload.title, upload.artist);
        let engine = &base64::engine::general_purpose::STANDARD;

        let mut resources = vec![ResourceSpec {
            name: identity.name.clone(),
            service: ServiceKind::Audio,
            identifier: identifier.clone(),
            title: Some(upload.title.clone()),
            description: Some(description),
            filename: Some(upload.filename.clone()),
            data: None,
            data64: Some(engine.encode(&upload.bytes)),
        }];
        let has_thumbnail = upload.thumbnail.is_some();
        if let Some(thumbnail) = upload.thumbnail {
            // Same identifier as the audio, per the addressing convention.
            resources.push(ResourceSpec {
                name: identity.name.clone(),
                service: ServiceKind::Thumbnail,
                identifier: identifier.clone(),
                title: None,
                description: None,
                filename: Some(thumbnail.filename),
                data: None,
                data64: Some(engine.encode(&thumbnail.bytes)),
            });
        }

        let response = self.call(BridgeRequest::publish_multiple(resources)).await?;
        Self::check_publish_response(response)?;
        info!(%identifier, title = %upload.title, "audio published");
        Ok(PublishReceipt {
            identifier,
            filename: upload.filename,
            thumbnail: has_thumbnail.then_some(ThumbnailStatus::Published),
        })
    }

    /// Resolve the logged-in host account into a publishing identity:
    /// account data first, then any registered names for the address,
    /// falling back to a shortened address as the display name.
    pub async fn login(&self) -> Result<Option<Identity>> {
        let account = self.call(BridgeRequest::account_data()).await?;
        let Some(address) = account.get("address").and_then(Value::as_str) else {
            return Ok(None);
        };
        let public_key = account
            .get("publicKey")
            .and_then(Value::as_str)
            .map(str::to_owned);

        let name = match self.call(BridgeRequest::account_names(address)).await {
            Ok(Value::Array(names)) => names
                .first()
                .and_then(|n| n.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            Ok(_) => None,
            Err(err) => {
                warn!(%err, "name lookup failed, falling back to address");
                None
            }
        };
        let name = name.unwrap_or_else(|| {
            format!("User {}...", address.chars().take(6).collect::<String>())
        });

        Ok(Some(Identity {
            name,
            address: Some(address.to_owned()),
            public_key,
        }))
    }
}
