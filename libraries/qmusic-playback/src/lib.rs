//! Q-Music Playback
//!
//! Playback session state: queue, navigation, repeat/shuffle, volume.
//!
//! Audio output itself is a black box behind the [`MediaTransport`] trait;
//! this crate owns everything above it. A [`PlaybackSession`] is an
//! explicit object — one per player surface, no global state — and pushes
//! its state changes to registered observers.
//!
//! # Example
//!
//! ```ignore
//! use qmusic_playback::{PlaybackSession, RepeatMode};
//!
//! let mut session = PlaybackSession::new(transport);
//! session.set_queue(tracks);
//! session.set_repeat(RepeatMode::All);
//! session.play()?;
//! session.next()?;
//! ```

#![forbid(unsafe_code)]

mod session;
mod types;

// Re-export main types
pub use session::{MediaTransport, PlaybackSession};
pub use types::{PlaybackConfig, PlaybackError, PlaybackEvent, RepeatMode, Result};
