//! Audio boundary
//!
//! The mixer drives audio through the minimal playback primitive defined in
//! [`backend`]: bind a source, start (possibly asynchronously), pause, and
//! adjust volume, loop flag and position. The production implementation
//! lives in [`backend::rodio_backend`].

pub mod backend;
pub mod loader;
pub mod request;
pub mod source;

pub use backend::{AudioBackend, AudioBackendConfig, PlaybackHandle};
pub use request::{PlayCompleter, PlayRequest};

use thiserror::Error;

/// Audio boundary errors
///
/// Any of these arriving as the outcome of a [`PlayRequest`] means the
/// playback start was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Source bytes could not be retrieved
    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        /// Source locator
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// Source locator uses a scheme the loader cannot read
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Source bytes are not decodable audio
    #[error("Failed to decode {url}: {reason}")]
    Decode {
        /// Source locator
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// No sink could be created on the output stream
    #[error("Audio sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The handle was released before the request completed
    #[error("Playback handle was released")]
    Released,

    /// The request was dropped without an outcome
    #[error("Playback start abandoned")]
    StartAbandoned,
}
