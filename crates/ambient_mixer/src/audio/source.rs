//! Decoded tracks and the cursor-driven looping source
//!
//! Rodio sources cannot change their loop behaviour once appended to a sink,
//! and `repeat_infinite` cannot be switched off. [`LoopedSource`] reads a
//! fully decoded track through a shared [`PlaybackCursor`] instead, so the
//! control thread can flip looping and seek while the output thread plays.

use rodio::Source;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Interleaved 16-bit PCM samples of a fully decoded track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTrack {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedTrack {
    /// Wrap decoded samples. Zero channels or rate are coerced to 1.
    ///
    /// A trailing partial frame is dropped.
    pub fn new(mut samples: Vec<i16>, channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let whole_frames = samples.len() - samples.len() % usize::from(channels);
        samples.truncate(whole_frames);
        Self {
            samples,
            channels,
            sample_rate: sample_rate.max(1),
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Channel count
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the track holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playing time of the whole track
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels);
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate))
    }

    /// Index of the first sample of the frame playing at `position`
    ///
    /// Positions past the end map to the track length.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample_index(&self, position: Duration) -> usize {
        let frame = (position.as_secs_f64() * f64::from(self.sample_rate)).floor() as usize;
        frame
            .saturating_mul(usize::from(self.channels))
            .min(self.samples.len())
    }
}

/// No seek queued
const NO_SEEK: usize = usize::MAX;

/// Read position and loop flag shared between control and output threads
///
/// Seeks are queued and taken up by the reader at the next frame boundary,
/// so a seek never splits a frame across two positions.
#[derive(Debug)]
pub struct PlaybackCursor {
    position: AtomicUsize,
    pending_seek: AtomicUsize,
    looping: AtomicBool,
}

impl PlaybackCursor {
    /// Cursor at the start of the track
    pub const fn new(looping: bool) -> Self {
        Self {
            position: AtomicUsize::new(0),
            pending_seek: AtomicUsize::new(NO_SEEK),
            looping: AtomicBool::new(looping),
        }
    }

    /// Sample index the next frame starts from, counting a queued seek
    pub fn position(&self) -> usize {
        match self.pending_seek.load(Ordering::Acquire) {
            NO_SEEK => self.position.load(Ordering::Acquire),
            target => target,
        }
    }

    /// Move to a sample index at the next frame boundary
    pub fn seek(&self, index: usize) {
        self.pending_seek.store(index.min(NO_SEEK - 1), Ordering::Release);
    }

    /// Whether reads wrap at the end
    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }

    /// Set whether reads wrap at the end
    pub fn set_looping(&self, looping: bool) {
        self.looping.store(looping, Ordering::Release);
    }

    /// Whether the cursor sits at or past the end of a track of `len` samples
    pub fn at_end(&self, len: usize) -> bool {
        self.position() >= len
    }

    /// Claim the next sample index, wrapping when looping
    ///
    /// Only one reader may advance a cursor. `len` must be a whole number of
    /// `channels`-sample frames.
    fn advance(&self, len: usize, channels: usize) -> Option<usize> {
        let channels = channels.max(1);
        let mut current = self.position.load(Ordering::Acquire);
        if current % channels == 0 {
            let target = self.pending_seek.swap(NO_SEEK, Ordering::AcqRel);
            if target != NO_SEEK {
                current = (target - target % channels).min(len);
            }
        }

        if current >= len {
            if len == 0 || !self.is_looping() {
                self.position.store(current, Ordering::Release);
                return None;
            }
            current = 0;
        }
        self.position.store(current + 1, Ordering::Release);
        Some(current)
    }
}

/// Rodio source reading a decoded track through a shared cursor
pub struct LoopedSource {
    track: Arc<DecodedTrack>,
    cursor: Arc<PlaybackCursor>,
}

impl LoopedSource {
    /// Source over `track`, positioned by `cursor`
    pub const fn new(track: Arc<DecodedTrack>, cursor: Arc<PlaybackCursor>) -> Self {
        Self { track, cursor }
    }
}

impl Iterator for LoopedSource {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let index = self
            .cursor
            .advance(self.track.len(), usize::from(self.track.channels))?;
        self.track.samples.get(index).copied()
    }
}

impl Source for LoopedSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.track.channels
    }

    fn sample_rate(&self) -> u32 {
        self.track.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        if self.cursor.is_looping() {
            None
        } else {
            Some(self.track.duration())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn track() -> Arc<DecodedTrack> {
        Arc::new(DecodedTrack::new(vec![1, 2, 3, 4], 2, 4))
    }

    #[test]
    fn test_looping_source_wraps() {
        let cursor = Arc::new(PlaybackCursor::new(true));
        let source = LoopedSource::new(track(), Arc::clone(&cursor));
        let samples: Vec<i16> = source.take(6).collect();
        assert_eq!(samples, vec![1, 2, 3, 4, 1, 2]);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_non_looping_source_ends() {
        let cursor = Arc::new(PlaybackCursor::new(false));
        let source = LoopedSource::new(track(), Arc::clone(&cursor));
        let samples: Vec<i16> = source.collect();
        assert_eq!(samples.len(), 4);
        assert!(cursor.at_end(4));
    }

    #[test]
    fn test_loop_flag_switches_mid_stream() {
        let cursor = Arc::new(PlaybackCursor::new(false));
        let mut source = LoopedSource::new(track(), Arc::clone(&cursor));
        for _ in 0..4 {
            assert!(source.next().is_some());
        }
        assert_eq!(source.next(), None);

        cursor.set_looping(true);
        assert_eq!(source.next(), Some(1));
    }

    #[test]
    fn test_seek_resets_position() {
        let cursor = Arc::new(PlaybackCursor::new(true));
        let mut source = LoopedSource::new(track(), Arc::clone(&cursor));
        source.next();
        source.next();
        cursor.seek(0);
        assert_eq!(cursor.position(), 0);
        assert_eq!(source.next(), Some(1));
    }

    #[test]
    fn test_seek_mid_frame_keeps_channels_aligned() {
        // Left samples positive, right samples negative
        let stereo = Arc::new(DecodedTrack::new(vec![1, -1, 2, -2, 3, -3], 2, 4));
        let cursor = Arc::new(PlaybackCursor::new(true));
        let mut source = LoopedSource::new(stereo, Arc::clone(&cursor));

        assert_eq!(source.next(), Some(1));
        cursor.seek(0);
        let rest: Vec<i16> = source.by_ref().take(5).collect();
        assert_eq!(rest, vec![-1, 1, -1, 2, -2]);
    }

    #[test]
    fn test_seek_to_odd_index_snaps_to_frame_start() {
        let stereo = Arc::new(DecodedTrack::new(vec![1, -1, 2, -2, 3, -3], 2, 4));
        let cursor = Arc::new(PlaybackCursor::new(false));
        let mut source = LoopedSource::new(stereo, Arc::clone(&cursor));

        cursor.seek(3);
        assert_eq!(source.next(), Some(2));
        assert_eq!(source.next(), Some(-2));
    }

    #[test]
    fn test_partial_frame_is_dropped() {
        let track = DecodedTrack::new(vec![1, -1, 2, -2, 3], 2, 4);
        assert_eq!(track.samples(), &[1, -1, 2, -2]);

        let cursor = Arc::new(PlaybackCursor::new(true));
        let source = LoopedSource::new(Arc::new(track), cursor);
        let samples: Vec<i16> = source.take(6).collect();
        assert_eq!(samples, vec![1, -1, 2, -2, 1, -1]);
    }

    #[test]
    fn test_empty_track_is_silent() {
        let cursor = Arc::new(PlaybackCursor::new(true));
        let mut source =
            LoopedSource::new(Arc::new(DecodedTrack::new(Vec::new(), 1, 44_100)), cursor);
        assert_eq!(source.next(), None);
    }

    #[test]
    fn test_sample_index_aligns_to_frames() {
        let track = DecodedTrack::new(vec![0; 8_000], 2, 1_000);
        assert_eq!(track.sample_index(Duration::ZERO), 0);
        assert_eq!(track.sample_index(Duration::from_millis(1_500)), 3_000);
        assert_eq!(track.sample_index(Duration::from_secs(60)), 8_000);
        assert_relative_eq!(track.duration().as_secs_f64(), 4.0);
    }
}
