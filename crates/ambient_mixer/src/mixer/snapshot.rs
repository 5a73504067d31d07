//! Render snapshots of the mix

use super::{PlaybackController, PlaybackState, PlaybackStatus};
use crate::audio::backend::AudioBackend;
use crate::catalog::SoundId;
use serde::Serialize;

/// One sound as a presentation layer shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundCard {
    /// Sound id, to send gestures back with
    pub id: SoundId,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Display credit
    pub attribution: String,
    /// Opaque presentation hint
    pub color_theme: String,
    /// Current state
    pub state: PlaybackState,
    /// Playing/paused discriminant of `state`
    pub status: PlaybackStatus,
}

/// Read-only view of the whole mix for one render cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixSnapshot {
    /// Every sound, in catalog order
    pub sounds: Vec<SoundCard>,
    /// Titles of playing sounds, in catalog order
    pub active_sounds: Vec<String>,
}

impl MixSnapshot {
    pub(super) fn capture<B: AudioBackend>(controller: &PlaybackController<B>) -> Self {
        let sounds = controller
            .states()
            .map(|(sound, state)| SoundCard {
                id: sound.id.clone(),
                title: sound.title.clone(),
                description: sound.description.clone(),
                attribution: sound.attribution.clone(),
                color_theme: sound.color_theme.clone(),
                state,
                status: state.status(),
            })
            .collect();
        let active_sounds = controller
            .active_sounds()
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            sounds,
            active_sounds,
        }
    }

    /// Number of playing sounds
    pub fn active_count(&self) -> usize {
        self.active_sounds.len()
    }

    /// Short summary line, e.g. "2 sounds active"
    pub fn summary(&self) -> String {
        match self.active_count() {
            1 => "1 sound active".to_string(),
            n => format!("{n} sounds active"),
        }
    }

    /// Card for one sound
    pub fn card(&self, id: &str) -> Option<&SoundCard> {
        self.sounds.iter().find(|card| card.id == id)
    }
}
