//! Audio backend implementations
//!
//! Platform-independent abstraction over the playback engine. The mixer only
//! ever talks to the two traits here.

pub mod rodio_backend;

use super::request::PlayRequest;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Factory binding sound sources to playback handles
///
/// # Threading
/// Not required to be `Send`: the mixer drives its backend from a single
/// control thread. Implementations may do work on their own threads and
/// report back through [`PlayRequest`].
pub trait AudioBackend {
    /// Handle type produced by [`bind`](Self::bind)
    type Handle: PlaybackHandle;

    /// Bind a new handle to the source at `url`
    ///
    /// Binding never touches the output device; failures surface later as a
    /// rejected [`PlayRequest`].
    fn bind(&mut self, url: &str) -> Self::Handle;
}

/// Live binding to one audio stream
pub trait PlaybackHandle {
    /// Request playback start, resuming from the current position
    fn play(&mut self) -> PlayRequest;

    /// Stop output, keeping the current position
    fn pause(&mut self);

    /// Set output volume (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, volume: f32);

    /// Set whether playback wraps around at the end of the stream
    fn set_looping(&mut self, looping: bool);

    /// Move the playback position
    fn set_position(&mut self, position: Duration);

    /// Release the underlying stream resource
    ///
    /// After release the handle produces no output and every further
    /// [`play`](Self::play) is rejected.
    fn release(&mut self);
}

/// Configuration for audio backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBackendConfig {
    /// Timeout for fetching remote sources, in seconds
    pub fetch_timeout_secs: u64,
    /// Largest source accepted, in bytes
    pub max_download_bytes: u64,
    /// Largest decoded track accepted, in interleaved samples
    pub max_decoded_samples: u64,
}

impl AudioBackendConfig {
    /// Fetch timeout as a [`Duration`]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Decoded sample limit, saturated to the platform's `usize`
    pub fn decoded_sample_limit(&self) -> usize {
        usize::try_from(self.max_decoded_samples).unwrap_or(usize::MAX)
    }
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            max_download_bytes: 64 * 1024 * 1024,
            // Ten minutes of 48 kHz stereo
            max_decoded_samples: 48_000 * 2 * 60 * 10,
        }
    }
}

/// Create the default audio backend for the platform
pub fn create_backend(
    config: AudioBackendConfig,
) -> Result<rodio_backend::RodioBackend, super::AudioError> {
    rodio_backend::RodioBackend::new(config)
}
