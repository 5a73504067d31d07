//! # Ambient Mixer
//!
//! A layered ambient soundscape mixer: a fixed catalog of looped ambient
//! tracks, each independently played, paused, volume-adjusted and
//! loop-toggled to build a custom mix.
//!
//! ## Features
//!
//! - **Catalog**: Immutable, ordered sound descriptors (built-in or configured)
//! - **Playback Controller**: Per-sound state machine with lazily bound handles
//! - **Rodio Backend**: Fetches, decodes and plays sources from URLs or files
//! - **Scoped Teardown**: Every handle is released when the controller drops
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ambient_mixer::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ambient_mixer::foundation::logging::init();
//!
//!     let backend = RodioBackend::new(AudioBackendConfig::default())?;
//!     let mut mixer = PlaybackController::new(Catalog::builtin(), backend);
//!
//!     mixer.toggle_play("rain")?;
//!     mixer.set_volume("rain", 0.4)?;
//!     mixer.toggle_play("forest")?;
//!     println!("{}", mixer.snapshot().summary());
//!
//!     mixer.stop_all();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod audio;
pub mod catalog;
pub mod config;
pub mod foundation;
pub mod mixer;

/// Common imports for mixer users
pub mod prelude {
    pub use crate::{
        audio::{
            backend::{rodio_backend::RodioBackend, AudioBackend, AudioBackendConfig, PlaybackHandle},
            AudioError, PlayRequest,
        },
        catalog::{Catalog, SoundDescriptor, SoundId},
        config::{Config, ConfigError, MixerConfig},
        mixer::{
            MixSnapshot, MixerError, PlaybackController, PlaybackDefaults, PlaybackState,
            PlaybackStatus, SoundCard,
        },
    };
}
