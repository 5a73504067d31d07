//! Per-sound playback state

use crate::catalog::{Catalog, SoundId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Volume every sound starts at
pub const DEFAULT_VOLUME: f32 = 0.6;

/// Initial values applied to every sound at start-up and on stop-all
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackDefaults {
    /// Starting volume (0.0 to 1.0)
    pub volume: f32,
    /// Whether sounds start with looping enabled
    pub looping: bool,
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            looping: true,
        }
    }
}

/// Observable playback state of one sound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Output volume (0.0 to 1.0)
    pub volume: f32,
    /// Whether the user asked for this sound to play
    pub is_playing: bool,
    /// Whether the sound wraps around at the end
    pub is_looping: bool,
}

impl PlaybackState {
    /// Paused state carrying the given defaults
    pub const fn from_defaults(defaults: PlaybackDefaults) -> Self {
        Self {
            volume: defaults.volume,
            is_playing: false,
            is_looping: defaults.looping,
        }
    }

    /// Playing/paused discriminant
    pub const fn status(&self) -> PlaybackStatus {
        if self.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::from_defaults(PlaybackDefaults::default())
    }
}

/// Discriminant of the per-sound state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Not playing; the initial state
    Paused,
    /// Playing (as requested by the user)
    Playing,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused => f.write_str("Paused"),
            Self::Playing => f.write_str("Now playing"),
        }
    }
}

/// State of every sound, keyed by id
pub type SoundStateMap = HashMap<SoundId, PlaybackState>;

/// One default-valued state per catalog sound
pub fn initial_states(catalog: &Catalog, defaults: PlaybackDefaults) -> SoundStateMap {
    catalog
        .ids()
        .map(|id| (id.to_string(), PlaybackState::from_defaults(defaults)))
        .collect()
}
