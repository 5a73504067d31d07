//! Source loading
//!
//! Resolves a sound's source locator, reads its bytes and decodes them into a
//! [`DecodedTrack`]. Remote sources (`http`, `https`) are fetched with a
//! blocking `reqwest` client, so loading must run off the control thread.
//! `file://` URLs and bare paths are read from disk.

use super::backend::AudioBackendConfig;
use super::source::DecodedTrack;
use super::AudioError;
use rodio::{Decoder, Source};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use url::Url;

/// Where a source locator points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// HTTP(S) resource
    Remote(Url),
    /// Local file
    File(PathBuf),
}

/// Classify a source locator
pub fn locate(locator: &str) -> Result<SourceLocation, AudioError> {
    match Url::parse(locator) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(SourceLocation::Remote(url)),
            "file" => url
                .to_file_path()
                .map(SourceLocation::File)
                .map_err(|()| AudioError::UnsupportedSource(locator.to_string())),
            // Windows drive letters parse as one-letter schemes
            scheme if scheme.len() == 1 => Ok(SourceLocation::File(PathBuf::from(locator))),
            _ => Err(AudioError::UnsupportedSource(locator.to_string())),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(SourceLocation::File(PathBuf::from(locator)))
        }
        Err(e) => Err(AudioError::UnsupportedSource(format!("{locator}: {e}"))),
    }
}

/// Read the raw bytes behind a source locator
pub fn fetch(locator: &str, config: &AudioBackendConfig) -> Result<Vec<u8>, AudioError> {
    let fetch_error = |reason: String| AudioError::Fetch {
        url: locator.to_string(),
        reason,
    };

    match locate(locator)? {
        SourceLocation::Remote(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(config.fetch_timeout())
                .build()
                .map_err(|e| fetch_error(e.to_string()))?;
            let response = client
                .get(url)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .map_err(|e| fetch_error(e.to_string()))?;

            if let Some(length) = response.content_length() {
                if length > config.max_download_bytes {
                    return Err(fetch_error(format!(
                        "source is {length} bytes, limit is {}",
                        config.max_download_bytes
                    )));
                }
            }

            let mut bytes = Vec::new();
            response
                .take(config.max_download_bytes.saturating_add(1))
                .read_to_end(&mut bytes)
                .map_err(|e| fetch_error(e.to_string()))?;
            if bytes.len() as u64 > config.max_download_bytes {
                return Err(fetch_error(format!(
                    "source exceeds limit of {} bytes",
                    config.max_download_bytes
                )));
            }
            Ok(bytes)
        }
        SourceLocation::File(path) => {
            let length = std::fs::metadata(&path)
                .map_err(|e| fetch_error(e.to_string()))?
                .len();
            if length > config.max_download_bytes {
                return Err(fetch_error(format!(
                    "source is {length} bytes, limit is {}",
                    config.max_download_bytes
                )));
            }
            std::fs::read(&path).map_err(|e| fetch_error(e.to_string()))
        }
    }
}

/// Decode encoded audio (WAV, OGG Vorbis, MP3, FLAC, ...) to 16-bit PCM
///
/// Decoding stops with an error once the track exceeds `max_samples`
/// interleaved samples.
pub fn decode(
    locator: &str,
    bytes: Vec<u8>,
    max_samples: usize,
) -> Result<DecodedTrack, AudioError> {
    let decode_error = |reason: String| AudioError::Decode {
        url: locator.to_string(),
        reason,
    };
    let decoder = Decoder::new(Cursor::new(bytes)).map_err(|e| decode_error(e.to_string()))?;

    // Metadata must be read before the decoder is consumed
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<i16> = decoder.take(max_samples.saturating_add(1)).collect();
    if samples.len() > max_samples {
        return Err(decode_error(format!(
            "decoded audio exceeds limit of {max_samples} samples"
        )));
    }

    Ok(DecodedTrack::new(samples, channels, sample_rate))
}

/// Fetch and decode a source
pub fn load(locator: &str, config: &AudioBackendConfig) -> Result<DecodedTrack, AudioError> {
    let bytes = fetch(locator, config)?;
    let track = decode(locator, bytes, config.decoded_sample_limit())?;
    log::debug!(
        "Loaded {}: {} channel(s) at {} Hz, {:.1}s",
        locator,
        track.channels(),
        track.sample_rate(),
        track.duration().as_secs_f32()
    );
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mono 16-bit PCM WAV file
    fn wav_bytes(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = u32::try_from(samples.len() * 2).unwrap();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_locate_classifies_sources() {
        assert!(matches!(
            locate("https://cdn.example.com/rain.mp3"),
            Ok(SourceLocation::Remote(_))
        ));
        assert_eq!(
            locate("sounds/rain.ogg"),
            Ok(SourceLocation::File(PathBuf::from("sounds/rain.ogg")))
        );
        assert!(matches!(
            locate("ftp://example.com/rain.mp3"),
            Err(AudioError::UnsupportedSource(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_file_url() {
        assert_eq!(
            locate("file:///tmp/rain.ogg"),
            Ok(SourceLocation::File(PathBuf::from("/tmp/rain.ogg")))
        );
    }

    #[test]
    fn test_fetch_missing_file() {
        let result = fetch(
            "definitely/not/here/rain.ogg",
            &AudioBackendConfig::default(),
        );
        assert!(matches!(result, Err(AudioError::Fetch { .. })));
    }

    #[test]
    fn test_fetch_respects_size_limit() {
        let path = std::env::temp_dir().join("ambient_mixer_loader_limit.wav");
        std::fs::write(&path, wav_bytes(8_000, &[0; 64])).unwrap();

        let config = AudioBackendConfig {
            max_download_bytes: 16,
            ..AudioBackendConfig::default()
        };
        let result = fetch(path.to_str().unwrap(), &config);
        assert!(matches!(result, Err(AudioError::Fetch { .. })));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode("noise.bin", vec![0x42; 128], usize::MAX);
        assert!(matches!(result, Err(AudioError::Decode { .. })));
    }

    #[test]
    fn test_load_wav_from_disk() {
        let path = std::env::temp_dir().join("ambient_mixer_loader_tone.wav");
        let samples: Vec<i16> = (0..800).map(|i| if i % 2 == 0 { 8_000 } else { -8_000 }).collect();
        std::fs::write(&path, wav_bytes(8_000, &samples)).unwrap();

        let track = load(path.to_str().unwrap(), &AudioBackendConfig::default()).unwrap();
        assert_eq!(track.channels(), 1);
        assert_eq!(track.sample_rate(), 8_000);
        assert!(!track.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_decode_respects_sample_limit() {
        let bytes = wav_bytes(8_000, &[100; 64]);

        let result = decode("tone.wav", bytes.clone(), 63);
        assert!(matches!(result, Err(AudioError::Decode { .. })));

        let track = decode("tone.wav", bytes, 64).unwrap();
        assert_eq!(track.len(), 64);
        assert!(track.samples().iter().all(|&sample| sample == 100));
    }

    #[test]
    fn test_load_applies_configured_sample_limit() {
        let path = std::env::temp_dir().join("ambient_mixer_loader_long.wav");
        std::fs::write(&path, wav_bytes(8_000, &[0; 800])).unwrap();

        let config = AudioBackendConfig {
            max_decoded_samples: 400,
            ..AudioBackendConfig::default()
        };
        let result = load(path.to_str().unwrap(), &config);
        assert!(matches!(result, Err(AudioError::Decode { .. })));

        let _ = std::fs::remove_file(path);
    }
}
