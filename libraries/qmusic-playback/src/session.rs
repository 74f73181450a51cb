//! The playback session: queue navigation over a media transport.

use crate::types::{PlaybackConfig, PlaybackError, PlaybackEvent, RepeatMode, Result};
use qmusic_core::Track;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// The side-effecting half of playback, behind a trait.
///
/// The session never touches audio itself; it drives whatever element the
/// host provides through this interface. Implementations resolve the
/// track to playable content however they like.
pub trait MediaTransport {
    /// Prepare a track for playback. Playback starts on [`play`].
    ///
    /// [`play`]: MediaTransport::play
    fn load(&mut self, track: &Track) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32) -> Result<()>;
    /// Current playback position within the loaded track.
    fn position(&self) -> Duration;
}

type Observer = Box<dyn Fn(&PlaybackEvent) + Send>;

/// Queue, position, and playback state for one listening session.
///
/// An explicit object: create one per player surface, drop it to tear the
/// session down. State changes are pushed to registered observers; the
/// transport is only ever touched in response to a method call.
pub struct PlaybackSession<T> {
    transport: T,
    config: PlaybackConfig,
    queue: Vec<Track>,
    current: Option<usize>,
    repeat: RepeatMode,
    shuffle: bool,
    volume: f32,
    muted: bool,
    playing: bool,
    observers: Vec<Observer>,
}

impl<T: MediaTransport> PlaybackSession<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, PlaybackConfig::default())
    }

    pub fn with_config(transport: T, config: PlaybackConfig) -> Self {
        Self {
            transport,
            volume: config.default_volume,
            config,
            queue: Vec::new(),
            current: None,
            repeat: RepeatMode::Off,
            shuffle: false,
            muted: false,
            playing: false,
            observers: Vec::new(),
        }
    }

    /// Register an observer for session events.
    pub fn subscribe(&mut self, observer: impl Fn(&PlaybackEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&self, event: &PlaybackEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }

    /// Replace the queue. The current position resets; nothing starts
    /// playing until [`play_index`] is called.
    ///
    /// [`play_index`]: PlaybackSession::play_index
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        debug!(len = tracks.len(), "queue replaced");
        self.queue = tracks;
        self.current = None;
        self.playing = false;
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.queue.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.shuffle = on;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Set the volume, clamped to `0.0..=1.0`. Applied immediately unless
    /// muted; the unmuted level is remembered either way.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume.clamp(0.0, 1.0);
        self.transport.set_volume(self.effective_volume())?;
        self.emit(&PlaybackEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
        Ok(())
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn toggle_mute(&mut self) -> Result<()> {
        self.muted = !self.muted;
        self.transport.set_volume(self.effective_volume())?;
        self.emit(&PlaybackEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
        });
        Ok(())
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Load and start the track at `index`.
    pub fn play_index(&mut self, index: usize) -> Result<()> {
        let Some(track) = self.queue.get(index) else {
            return Err(PlaybackError::IndexOutOfBounds {
                index,
                len: self.queue.len(),
            });
        };
        debug!(index, identifier = %track.identifier, "starting track");
        self.transport.load(track)?;
        self.transport.set_volume(self.effective_volume())?;
        self.transport.play()?;
        self.current = Some(index);
        self.playing = true;
        self.emit(&PlaybackEvent::TrackChanged { index });
        Ok(())
    }

    /// Resume the current track, or start the queue from the top.
    pub fn play(&mut self) -> Result<()> {
        match self.current {
            Some(_) => {
                self.transport.play()?;
                self.playing = true;
                self.emit(&PlaybackEvent::Resumed);
                Ok(())
            }
            None if self.queue.is_empty() => Err(PlaybackError::EmptyQueue),
            None => self.play_index(0),
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        self.transport.pause()?;
        self.playing = false;
        self.emit(&PlaybackEvent::Paused);
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        if self.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    fn restart_current(&mut self) -> Result<()> {
        self.transport.seek(Duration::ZERO)?;
        self.transport.play()?;
        self.playing = true;
        Ok(())
    }

    fn shuffled_target(&self, current: usize) -> usize {
        if self.queue.len() < 2 {
            return current;
        }
        // Any index but the current one.
        let pick = rand::thread_rng().gen_range(0..self.queue.len() - 1);
        if pick >= current {
            pick + 1
        } else {
            pick
        }
    }

    /// Advance to the next track: repeat-one restarts, shuffle jumps to a
    /// random other track, otherwise the following index with repeat-all
    /// wraparound. Past the end with repeat off, playback stops and the
    /// position is kept.
    pub fn next(&mut self) -> Result<()> {
        let Some(current) = self.current else {
            return self.play();
        };
        match self.repeat {
            RepeatMode::One => self.restart_current(),
            _ if self.shuffle => self.play_index(self.shuffled_target(current)),
            _ if current + 1 < self.queue.len() => self.play_index(current + 1),
            RepeatMode::All => self.play_index(0),
            RepeatMode::Off => {
                debug!("queue ended");
                self.transport.pause()?;
                self.playing = false;
                self.emit(&PlaybackEvent::QueueEnded);
                Ok(())
            }
        }
    }

    /// React to the transport reporting the current track finished.
    pub fn handle_ended(&mut self) -> Result<()> {
        self.next()
    }

    /// Go back: past the restart threshold this restarts the current
    /// track; within it, it moves to the previous one (wrapping only with
    /// repeat-all). The first track restarts rather than underflowing.
    pub fn previous(&mut self) -> Result<()> {
        let Some(current) = self.current else {
            return self.play();
        };
        if self.transport.position() > self.config.previous_restart_threshold {
            return self.restart_current();
        }
        match current {
            0 if self.repeat == RepeatMode::All && self.queue.len() > 1 => {
                self.play_index(self.queue.len() - 1)
            }
            0 => self.restart_current(),
            _ => self.play_index(current - 1),
        }
    }
}
