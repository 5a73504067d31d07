//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Each bound
//! handle owns one [`Sink`] on the shared output stream, created on the
//! first playback start.
//!
//! Sources are loaded on first play: a background thread fetches and decodes
//! the whole track, then appends a [`LoopedSource`] to the sink. The
//! [`PlayRequest`] returned by that first `play` settles once the track is
//! queued, or with the fetch/decode error.
//!
//! # Example
//!
//! ```no_run
//! use ambient_mixer::audio::backend::{AudioBackend, AudioBackendConfig, PlaybackHandle};
//! use ambient_mixer::audio::backend::rodio_backend::RodioBackend;
//!
//! let mut backend = RodioBackend::new(AudioBackendConfig::default()).unwrap();
//! let mut handle = backend.bind("resources/audio/rain.ogg");
//!
//! handle.set_volume(0.5);
//! let _request = handle.play();
//! handle.pause();
//! handle.release();
//! ```

use super::{AudioBackend, AudioBackendConfig, PlaybackHandle};
use crate::audio::loader;
use crate::audio::request::{PlayCompleter, PlayRequest, PlayResult};
use crate::audio::source::{DecodedTrack, LoopedSource, PlaybackCursor};
use crate::audio::AudioError;
use crate::config::MixerConfig;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: OutputStream,
    /// Output stream handle for creating sinks
    stream_handle: OutputStreamHandle,
    config: Arc<AudioBackendConfig>,
    /// Number of handles bound so far
    bound: usize,
}

impl RodioBackend {
    /// Open the default output device
    ///
    /// # Errors
    /// - `BackendInitFailed` if no output stream can be created
    pub fn new(config: AudioBackendConfig) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            AudioError::BackendInitFailed(format!("Failed to create audio output: {e}"))
        })?;

        log::info!("Rodio audio backend initialized");
        Ok(Self {
            _output_stream: stream,
            stream_handle,
            config: Arc::new(config),
            bound: 0,
        })
    }

    /// Open the default output device with the `backend` section of a
    /// mixer configuration
    ///
    /// # Errors
    /// - `BackendInitFailed` if no output stream can be created
    pub fn from_config(config: &MixerConfig) -> Result<Self, AudioError> {
        Self::new(config.backend.clone())
    }

    /// Settings every handle loads with
    pub fn config(&self) -> &AudioBackendConfig {
        &self.config
    }

    /// Number of handles bound through this backend
    pub const fn bound_handles(&self) -> usize {
        self.bound
    }
}

impl AudioBackend for RodioBackend {
    type Handle = RodioHandle;

    fn bind(&mut self, url: &str) -> RodioHandle {
        self.bound += 1;
        log::debug!("Bound audio source {url}");
        RodioHandle {
            url: url.to_string(),
            stream_handle: self.stream_handle.clone(),
            config: Arc::clone(&self.config),
            sink: None,
            shared: Arc::new(SharedTrack::new()),
            volume: 1.0,
        }
    }
}

/// Load progress of a handle's track
enum LoadSlot {
    Idle,
    Loading,
    Ready(Arc<DecodedTrack>),
}

struct TrackState {
    slot: LoadSlot,
    /// Position requested before the track finished loading
    start_at: Duration,
}

/// State shared between a handle and its loader thread
struct SharedTrack {
    track: Mutex<TrackState>,
    cursor: Arc<PlaybackCursor>,
    released: AtomicBool,
}

impl SharedTrack {
    fn new() -> Self {
        Self {
            track: Mutex::new(TrackState {
                slot: LoadSlot::Idle,
                start_at: Duration::ZERO,
            }),
            cursor: Arc::new(PlaybackCursor::new(true)),
            released: AtomicBool::new(false),
        }
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Queue a freshly loaded track on `sink`, unless the handle was released
    fn finish_load(&self, outcome: PlayResult<DecodedTrack>, sink: &Sink) -> PlayResult {
        let mut state = self
            .track
            .lock()
            .map_err(|_| AudioError::SinkUnavailable("track state poisoned".to_string()))?;

        if self.is_released() {
            state.slot = LoadSlot::Idle;
            return Err(AudioError::Released);
        }

        match outcome {
            Ok(track) => {
                let track = Arc::new(track);
                self.cursor.seek(track.sample_index(state.start_at));
                state.start_at = Duration::ZERO;
                sink.append(LoopedSource::new(Arc::clone(&track), Arc::clone(&self.cursor)));
                state.slot = LoadSlot::Ready(track);
                Ok(())
            }
            Err(e) => {
                state.slot = LoadSlot::Idle;
                Err(e)
            }
        }
    }

    /// Resume a loaded track on `sink`
    ///
    /// A non-looping track that ran out restarts from the top.
    fn resume_ready(&self, track: &Arc<DecodedTrack>, sink: &Sink) {
        if sink.empty() {
            if self.cursor.at_end(track.len()) {
                self.cursor.seek(0);
            }
            sink.append(LoopedSource::new(
                Arc::clone(track),
                Arc::clone(&self.cursor),
            ));
        }
        sink.play();
    }

    /// Move the cursor, or remember the position until the track is loaded
    fn seek(&self, position: Duration) -> PlayResult {
        let mut guard = self
            .track
            .lock()
            .map_err(|_| AudioError::SinkUnavailable("track state poisoned".to_string()))?;
        let state = &mut *guard;
        match &state.slot {
            LoadSlot::Ready(track) => self.cursor.seek(track.sample_index(position)),
            LoadSlot::Idle | LoadSlot::Loading => state.start_at = position,
        }
        Ok(())
    }

    /// Mark released and silence `sink`
    ///
    /// Holds the track lock throughout, so a loader is either done appending
    /// before the sink stops or sees the flag and drops its track.
    fn release(&self, sink: Option<&Sink>) {
        let guard = self.track.lock();
        self.released.store(true, Ordering::Release);
        if let Some(sink) = sink {
            sink.stop();
        }
        if let Ok(mut state) = guard {
            state.slot = LoadSlot::Idle;
            state.start_at = Duration::ZERO;
        }
    }
}

/// Playback handle backed by a rodio [`Sink`]
pub struct RodioHandle {
    url: String,
    stream_handle: OutputStreamHandle,
    config: Arc<AudioBackendConfig>,
    sink: Option<Arc<Sink>>,
    shared: Arc<SharedTrack>,
    volume: f32,
}

impl RodioHandle {
    /// Source locator this handle is bound to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the track has been fetched and decoded
    pub fn is_loaded(&self) -> bool {
        self.shared
            .track
            .lock()
            .map(|state| matches!(state.slot, LoadSlot::Ready(_)))
            .unwrap_or(false)
    }

    /// Whether output is currently running (not paused, source queued)
    pub fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn ensure_sink(&mut self) -> Result<Arc<Sink>, AudioError> {
        if let Some(sink) = &self.sink {
            return Ok(Arc::clone(sink));
        }
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::SinkUnavailable(format!("Failed to create sink: {e}")))?;
        sink.set_volume(self.volume);
        let sink = Arc::new(sink);
        self.sink = Some(Arc::clone(&sink));
        Ok(sink)
    }

    fn spawn_load(&self, sink: Arc<Sink>, completer: PlayCompleter) {
        let url = self.url.clone();
        let config = Arc::clone(&self.config);
        let shared = Arc::clone(&self.shared);

        let spawned = thread::Builder::new()
            .name("ambient-loader".to_string())
            .spawn(move || {
                let outcome = shared.finish_load(loader::load(&url, &config), &sink);
                if let Err(e) = &outcome {
                    log::warn!("Could not start {url}: {e}");
                }
                completer.resolve(outcome);
            });

        // The completer went down with the closure, so the request settles
        // as abandoned; only the slot needs resetting.
        if let Err(e) = spawned {
            log::warn!("Failed to spawn loader for {}: {e}", self.url);
            if let Ok(mut state) = self.shared.track.lock() {
                state.slot = LoadSlot::Idle;
            }
        }
    }
}

impl PlaybackHandle for RodioHandle {
    fn play(&mut self) -> PlayRequest {
        if self.shared.is_released() {
            return PlayRequest::rejected(AudioError::Released);
        }
        let sink = match self.ensure_sink() {
            Ok(sink) => sink,
            Err(e) => return PlayRequest::rejected(e),
        };

        let Ok(mut guard) = self.shared.track.lock() else {
            return PlayRequest::rejected(AudioError::SinkUnavailable(
                "track state poisoned".to_string(),
            ));
        };
        let state = &mut *guard;

        match &state.slot {
            LoadSlot::Ready(track) => {
                self.shared.resume_ready(track, &sink);
                PlayRequest::accepted()
            }
            LoadSlot::Loading => {
                sink.play();
                PlayRequest::accepted()
            }
            LoadSlot::Idle => {
                state.slot = LoadSlot::Loading;
                drop(guard);
                sink.play();
                let (request, completer) = PlayRequest::pending();
                self.spawn_load(sink, completer);
                request
            }
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.shared.cursor.set_looping(looping);
    }

    fn set_position(&mut self, position: Duration) {
        if let Err(e) = self.shared.seek(position) {
            log::warn!("Ignoring seek on {}: {e}", self.url);
        }
    }

    fn release(&mut self) {
        let sink = self.sink.take();
        self.shared.release(sink.as_deref());
        log::debug!("Released audio source {}", self.url);
    }
}
