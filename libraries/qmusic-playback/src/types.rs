//! Playback session types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Playback errors.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media transport refused or failed an operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// An operation that needs a queue ran against an empty one.
    #[error("playback queue is empty")]
    EmptyQueue,

    /// A queue index outside the current queue.
    #[error("queue index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// What happens when the current track ends or `next` runs past the end
/// of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    Off,
    /// Wrap around to the first track.
    All,
    /// Restart the current track.
    One,
}

impl RepeatMode {
    /// The mode a repeat toggle advances to.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Tunable session parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// `previous` restarts the current track instead of moving back once
    /// playback is past this point.
    pub previous_restart_threshold: Duration,
    /// Volume a new session starts at, in `0.0..=1.0`.
    pub default_volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            previous_restart_threshold: Duration::from_secs(3),
            default_volume: 1.0,
        }
    }
}

/// State changes delivered to session observers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A different queue position started playing.
    TrackChanged { index: usize },
    /// The queue ran out with repeat off.
    QueueEnded,
    /// Playback paused.
    Paused,
    /// Playback resumed.
    Resumed,
    /// Volume or mute state changed.
    VolumeChanged { volume: f32, muted: bool },
}
