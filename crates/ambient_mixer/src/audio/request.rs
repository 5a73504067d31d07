//! Playback start requests
//!
//! Starting playback may complete later than the call that asked for it
//! (the source might still be downloading). A [`PlayRequest`] carries that
//! outcome; the side doing the work holds the matching [`PlayCompleter`].

use super::AudioError;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Outcome of a playback start request (or of loading work feeding one)
pub type PlayResult<T = ()> = Result<T, AudioError>;

enum RequestState {
    Settled(Option<PlayResult>),
    Pending(Receiver<PlayResult>),
}

/// Possibly pending outcome of [`PlaybackHandle::play`](super::PlaybackHandle::play)
pub struct PlayRequest {
    state: RequestState,
}

impl PlayRequest {
    /// A request that already succeeded
    pub fn accepted() -> Self {
        Self {
            state: RequestState::Settled(Some(Ok(()))),
        }
    }

    /// A request that was rejected immediately
    pub fn rejected(error: AudioError) -> Self {
        Self {
            state: RequestState::Settled(Some(Err(error))),
        }
    }

    /// A request settled later through the returned completer
    pub fn pending() -> (Self, PlayCompleter) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                state: RequestState::Pending(rx),
            },
            PlayCompleter { tx },
        )
    }

    /// Take the outcome if the request has settled
    ///
    /// Returns `None` while pending. The outcome is yielded once; later polls
    /// return `None`. A completer dropped without resolving settles the
    /// request as [`AudioError::StartAbandoned`].
    pub fn poll(&mut self) -> Option<PlayResult> {
        match &mut self.state {
            RequestState::Settled(outcome) => outcome.take(),
            RequestState::Pending(rx) => {
                let outcome = match rx.try_recv() {
                    Ok(outcome) => outcome,
                    Err(TryRecvError::Empty) => return None,
                    Err(TryRecvError::Disconnected) => Err(AudioError::StartAbandoned),
                };
                self.state = RequestState::Settled(None);
                Some(outcome)
            }
        }
    }

    /// Whether the outcome is still outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending(_))
    }
}

impl std::fmt::Debug for PlayRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            RequestState::Settled(outcome) => f.debug_tuple("Settled").field(outcome).finish(),
            RequestState::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Settles a pending [`PlayRequest`] from the thread doing the work
#[derive(Debug)]
pub struct PlayCompleter {
    tx: Sender<PlayResult>,
}

impl PlayCompleter {
    /// Deliver the outcome. A request that was already dropped ignores it.
    pub fn resolve(self, outcome: PlayResult) {
        let _ = self.tx.send(outcome);
    }
}
