//! Q-Music Network
//!
//! Typed access to the Content Network through the host-provided request
//! bridge.
//!
//! The host page injects a single asynchronous call-and-response function;
//! this crate types that contract ([`Bridge`]) and layers the
//! [`SourceAdapter`] on top of it: listings with legacy-bucket fallback,
//! playlist fetch/publish/update, audio upload, identity resolution, and
//! deterministic mock data for standalone operation.
//!
//! # Example
//!
//! ```ignore
//! use qmusic_network::{Identity, SourceAdapter};
//! use qmusic_core::{PlaylistDraft, PlaylistEntry};
//!
//! # async fn example(bridge: impl qmusic_network::Bridge) -> qmusic_network::Result<()> {
//! let adapter = SourceAdapter::new(bridge);
//!
//! // Browse
//! let tracks = adapter.list_recent_tracks(20, 0).await;
//!
//! // Publish
//! let identity = adapter.login().await?.expect("not logged in");
//! let draft = PlaylistDraft {
//!     name: "Summer Hits".into(),
//!     description: String::new(),
//!     entries: vec![/* ... */],
//! };
//! let (playlist, receipt) = adapter.publish_playlist(&identity, draft, None).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod adapter;
mod bridge;
mod error;
pub mod mock;
mod types;
pub mod urls;

// Re-export main types
pub use adapter::{AdapterConfig, SourceAdapter, PLAYLIST_QUERY, TRACK_QUERY};
pub use bridge::{Bridge, BridgeAction, BridgeRequest, NoBridge, ResourceSpec};
pub use error::{NetworkError, Result};
pub use types::{
    AudioUpload, Identity, PublishReceipt, RawMetadata, RawRecord, ThumbnailStatus,
    ThumbnailUpload,
};
