//! Domain types shared across Q-Music crates.

mod playlist;
mod service;
mod track;

pub use playlist::{Playlist, PlaylistDocument, PlaylistDraft, PlaylistEntry};
pub use service::ServiceKind;
pub use track::{ResourceKey, ResourceRef, Track};
