//! Playback controller
//!
//! [`PlaybackController`] owns one observable [`PlaybackState`] per catalog
//! sound and one lazily created [`PlaybackHandle`] per sound the user has
//! touched. Every operation updates the state record and the handle
//! together.
//!
//! Per sound the controller runs a two-state machine:
//!
//! ```text
//!            toggle_play (start request, volume/loop sync)
//!   Paused ------------------------------------------------> Playing
//!          <------------------------------------------------
//!            toggle_play (pause, position kept)
//!
//!   set_volume / toggle_loop: self-loops in either state
//!   stop_all: every sound back to Paused with default state
//! ```
//!
//! A rejected playback start is swallowed: the state keeps `is_playing`
//! set, reflecting what the user asked for rather than what the device did.

mod handles;
mod snapshot;
mod state;


pub use snapshot::{MixSnapshot, SoundCard};
pub use state::{
    initial_states, PlaybackDefaults, PlaybackState, PlaybackStatus, SoundStateMap,
    DEFAULT_VOLUME,
};

use crate::audio::backend::{AudioBackend, PlaybackHandle};
use crate::audio::request::{PlayRequest, PlayResult};
use crate::catalog::{Catalog, SoundDescriptor, SoundId};
use crate::config::{ConfigError, MixerConfig};
use handles::HandleTable;
use std::time::Duration;
use thiserror::Error;

/// Playback controller errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MixerError {
    /// The id is not in the catalog
    #[error("Unknown sound: {0}")]
    UnknownSound(SoundId),
}

/// A start request that had not settled when `play` returned
struct PendingStart {
    sound_id: SoundId,
    request: PlayRequest,
}

/// Owner of per-sound playback state and playback handles
///
/// Dropping the controller tears it down: every handle is paused and
/// released, so nothing keeps playing once the owning scope ends.
pub struct PlaybackController<B: AudioBackend> {
    catalog: Catalog,
    defaults: PlaybackDefaults,
    backend: B,
    states: SoundStateMap,
    handles: HandleTable<B::Handle>,
    pending: Vec<PendingStart>,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Controller with the standard defaults (volume 0.6, looping on)
    pub fn new(catalog: Catalog, backend: B) -> Self {
        Self::with_defaults(catalog, backend, PlaybackDefaults::default())
    }

    /// Controller with custom defaults
    ///
    /// Every sound starts paused with `defaults` applied. No handles are
    /// created until a sound is first touched.
    pub fn with_defaults(catalog: Catalog, backend: B, defaults: PlaybackDefaults) -> Self {
        let states = initial_states(&catalog, defaults);
        log::debug!("Playback controller initialized with {} sound(s)", catalog.len());
        Self {
            catalog,
            defaults,
            backend,
            states,
            handles: HandleTable::new(),
            pending: Vec::new(),
        }
    }

    /// Controller built from a validated [`MixerConfig`]
    ///
    /// Only `defaults` and `sounds` are read here. The `backend` section
    /// configures the backend itself, e.g. through
    /// [`RodioBackend::from_config`](crate::audio::backend::rodio_backend::RodioBackend::from_config).
    ///
    /// # Errors
    /// - `Invalid` if the defaults are out of range
    /// - `Catalog` if the configured sounds are malformed
    pub fn from_config(config: &MixerConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_defaults(config.catalog()?, backend, config.defaults))
    }

    /// The catalog this controller plays from
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Values sounds start at and reset to
    pub const fn defaults(&self) -> PlaybackDefaults {
        self.defaults
    }

    /// The audio backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Current state of one sound
    pub fn state(&self, id: &str) -> Result<PlaybackState, MixerError> {
        self.states
            .get(id)
            .copied()
            .ok_or_else(|| MixerError::UnknownSound(id.to_string()))
    }

    /// Every sound with its state, in catalog order
    pub fn states(&self) -> impl Iterator<Item = (&SoundDescriptor, PlaybackState)> {
        self.catalog.iter().map(|sound| {
            let state = self.states.get(&sound.id).copied().unwrap_or_default();
            (sound, state)
        })
    }

    /// The full state map
    pub const fn state_map(&self) -> &SoundStateMap {
        &self.states
    }

    /// Handle for a sound, bound on first use
    ///
    /// A new handle is bound to the sound's URL with the default loop flag
    /// and volume. Later calls return the same handle. Sound state is not
    /// touched.
    pub fn ensure_handle(&mut self, id: &str) -> Result<&mut B::Handle, MixerError> {
        let sound = self
            .catalog
            .get(id)
            .ok_or_else(|| MixerError::UnknownSound(id.to_string()))?;
        let backend = &mut self.backend;
        let defaults = self.defaults;

        Ok(self.handles.get_or_insert_with(id, || {
            log::debug!("Creating playback handle for {}", sound.id);
            let mut handle = backend.bind(&sound.url);
            handle.set_looping(defaults.looping);
            handle.set_volume(defaults.volume);
            handle
        }))
    }

    /// Flip a sound between paused and playing
    ///
    /// Starting applies the sound's volume and loop flag to its handle first.
    /// A rejected start leaves the sound marked as playing. Pausing keeps
    /// the playback position.
    pub fn toggle_play(&mut self, id: &str) -> Result<PlaybackState, MixerError> {
        self.poll_pending_starts();

        let current = self.state(id)?;
        let next = PlaybackState {
            is_playing: !current.is_playing,
            ..current
        };

        let handle = self.ensure_handle(id)?;
        handle.set_looping(current.is_looping);
        handle.set_volume(current.volume);
        if next.is_playing {
            let request = handle.play();
            self.track_start(id, request);
        } else {
            handle.pause();
        }

        self.states.insert(id.to_string(), next);
        log::debug!("{id}: {} -> {}", current.status(), next.status());
        Ok(next)
    }

    /// Set a sound's volume
    ///
    /// Values are clamped to `0.0..=1.0`. NaN is ignored and leaves both the
    /// state and the handle untouched. Playing and looping are unchanged.
    pub fn set_volume(&mut self, id: &str, value: f32) -> Result<PlaybackState, MixerError> {
        self.poll_pending_starts();

        let current = self.state(id)?;
        if value.is_nan() {
            log::warn!("Ignoring NaN volume for {id}");
            return Ok(current);
        }

        let volume = value.clamp(0.0, 1.0);
        self.ensure_handle(id)?.set_volume(volume);

        let next = PlaybackState { volume, ..current };
        self.states.insert(id.to_string(), next);
        Ok(next)
    }

    /// Flip a sound's loop flag
    ///
    /// Playing status and position are unchanged.
    pub fn toggle_loop(&mut self, id: &str) -> Result<PlaybackState, MixerError> {
        self.poll_pending_starts();

        let current = self.state(id)?;
        let next = PlaybackState {
            is_looping: !current.is_looping,
            ..current
        };
        self.ensure_handle(id)?.set_looping(next.is_looping);

        self.states.insert(id.to_string(), next);
        Ok(next)
    }

    /// Stop every sound and reset all state to the defaults
    ///
    /// Every created handle is paused and rewound to the start, and gets the
    /// default volume and loop flag so it matches the reset state.
    pub fn stop_all(&mut self) {
        self.poll_pending_starts();

        let defaults = self.defaults;
        for (_, handle) in self.handles.iter_mut() {
            handle.pause();
            handle.set_position(Duration::ZERO);
            handle.set_volume(defaults.volume);
            handle.set_looping(defaults.looping);
        }
        self.states = initial_states(&self.catalog, defaults);

        log::info!("Stopped all sounds ({} handle(s))", self.handles.len());
    }

    /// Pause and release every handle
    ///
    /// Each created handle is released exactly once; running this again (or
    /// dropping the controller afterwards) does nothing.
    pub fn teardown(&mut self) {
        let mut released = 0;
        for (id, mut handle) in self.handles.drain() {
            handle.pause();
            handle.release();
            log::debug!("Released playback handle for {id}");
            released += 1;
        }
        self.pending.clear();

        if released > 0 {
            log::info!("Playback controller released {released} handle(s)");
        }
    }

    /// Titles of playing sounds, in catalog order
    pub fn active_sounds(&self) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|sound| self.states.get(&sound.id).is_some_and(|state| state.is_playing))
            .map(|sound| sound.title.as_str())
            .collect()
    }

    /// Number of playing sounds
    pub fn active_count(&self) -> usize {
        self.states.values().filter(|state| state.is_playing).count()
    }

    /// Number of live handles
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Whether a handle exists for this sound
    pub fn has_handle(&self, id: &str) -> bool {
        self.handles.contains(id)
    }

    /// Number of start requests still outstanding
    pub fn pending_starts(&self) -> usize {
        self.pending.len()
    }

    /// Settle finished start requests
    ///
    /// Rejections are logged and dropped; state is never changed. Returns the
    /// number of requests settled.
    pub fn poll_pending_starts(&mut self) -> usize {
        let before = self.pending.len();
        self.pending.retain_mut(|pending| match pending.request.poll() {
            Some(outcome) => {
                settle_start(&pending.sound_id, outcome);
                false
            }
            None => true,
        });
        before - self.pending.len()
    }

    /// Everything a presentation layer needs to render the mix
    pub fn snapshot(&self) -> MixSnapshot {
        MixSnapshot::capture(self)
    }

    fn track_start(&mut self, id: &str, mut request: PlayRequest) {
        match request.poll() {
            Some(outcome) => settle_start(id, outcome),
            None => self.pending.push(PendingStart {
                sound_id: id.to_string(),
                request,
            }),
        }
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Playback start outcomes are observed, never acted on
fn settle_start(id: &str, outcome: PlayResult) {
    match outcome {
        Ok(()) => log::trace!("{id}: playback started"),
        Err(e) => log::debug!("{id}: playback start rejected, keeping requested state: {e}"),
    }
}
