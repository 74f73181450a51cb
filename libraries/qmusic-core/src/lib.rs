//! Q-Music Core
//!
//! Domain types, identifier handling, and error types shared by every
//! Q-Music crate.
//!
//! The Content Network addresses every published resource by an
//! `(owner, service, identifier)` triple. This crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `ServiceKind`, `ResourceKey`
//! - **Identifier Codec**: minting and parsing of the `qmusic_*` /
//!   `earbump_*` identifier namespaces
//! - **Error Handling**: unified `QMusicError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use qmusic_core::ids::{mint_track_identifier, extract_title};
//! use qmusic_core::types::{ServiceKind, Track};
//!
//! let identifier = mint_track_identifier("Hello World");
//! assert!(identifier.starts_with("qmusic_track_hello_world_"));
//! assert_eq!(extract_title(&identifier).as_deref(), Some("hello world"));
//!
//! let track = Track::new("alice", ServiceKind::Audio, identifier);
//! assert!(track.key().as_str().starts_with("alice_AUDIO_"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod ids;
pub mod types;

// Re-export commonly used types
pub use error::{QMusicError, Result};
pub use ids::Namespace;
pub use types::{
    Playlist, PlaylistDocument, PlaylistDraft, PlaylistEntry, ResourceKey, ResourceRef,
    ServiceKind, Track,
};
