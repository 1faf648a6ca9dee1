//! RIFF/WAVE packaging of raw PCM.

use derive_getters::Getters;
use std::io::Cursor;
use storyboard_core::AudioAsset;
use storyboard_error::{AudioError, AudioErrorKind, StoryboardResult};
use tracing::{debug, instrument, warn};

/// Length of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;
/// Speech output is mono.
pub const CHANNELS: u16 = 1;
/// Speech output is 16-bit signed little-endian.
pub const BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_SAMPLE: u32 = BITS_PER_SAMPLE as u32 / 8;

/// A playable container plus its duration.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct PackagedAudio {
    /// Container bytes
    container: Vec<u8>,
    /// Duration in seconds
    duration_seconds: f64,
}

impl PackagedAudio {
    /// Turn into an immutable asset with a fresh source id.
    pub fn into_asset(self) -> AudioAsset {
        AudioAsset::new(self.container, self.duration_seconds)
    }
}

/// Whether `bytes` already carry a RIFF/WAVE signature.
pub fn is_container(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// The 44-byte header for `payload_len` bytes of mono 16-bit PCM.
///
/// # Examples
///
/// ```
/// use storyboard_audio::wav_header;
///
/// let header = wav_header(100, 24_000);
/// assert_eq!(&header[0..4], b"RIFF");
/// assert_eq!(u32::from_le_bytes(header[4..8].try_into().unwrap()), 136);
/// assert_eq!(u32::from_le_bytes(header[40..44].try_into().unwrap()), 100);
/// ```
pub fn wav_header(payload_len: u32, sample_rate: u32) -> [u8; WAV_HEADER_LEN] {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let riff_size = payload_len.saturating_add(WAV_HEADER_LEN as u32 - 8);

    let mut header = [0u8; WAV_HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&riff_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // PCM chunk size
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM format
    header[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&payload_len.to_le_bytes());
    header
}

/// Wrap raw PCM in a WAV container, or pass an existing container through.
///
/// Duration of raw input is `len / (sample_rate * 2)`. For pass-through
/// input the container's own header is read; if it cannot be parsed the
/// same byte formula is applied to the whole buffer.
///
/// # Examples
///
/// ```
/// use storyboard_audio::package;
///
/// let packaged = package(&vec![0u8; 480_000], 24_000).unwrap();
/// assert_eq!(packaged.container().len(), 480_044);
/// assert_eq!(*packaged.duration_seconds(), 10.0);
/// ```
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn package(raw: &[u8], sample_rate: u32) -> StoryboardResult<PackagedAudio> {
    if raw.is_empty() {
        return Err(AudioError::new(AudioErrorKind::EmptyBuffer).into());
    }
    if sample_rate == 0 {
        return Err(AudioError::new(AudioErrorKind::InvalidSampleRate(sample_rate)).into());
    }

    if is_container(raw) {
        let duration_seconds = container_duration(raw)
            .unwrap_or_else(|| byte_duration(raw.len(), sample_rate));
        debug!(duration_seconds, "Passing existing container through");
        return Ok(PackagedAudio {
            container: raw.to_vec(),
            duration_seconds,
        });
    }

    let payload_len = u32::try_from(raw.len())
        .ok()
        .filter(|len| *len <= u32::MAX - WAV_HEADER_LEN as u32)
        .ok_or_else(|| AudioError::new(AudioErrorKind::TooLarge(raw.len())))?;

    let mut container = Vec::with_capacity(WAV_HEADER_LEN + raw.len());
    container.extend_from_slice(&wav_header(payload_len, sample_rate));
    container.extend_from_slice(raw);

    let duration_seconds = byte_duration(raw.len(), sample_rate);
    debug!(duration_seconds, "Packaged raw PCM");
    Ok(PackagedAudio {
        container,
        duration_seconds,
    })
}

fn byte_duration(len: usize, sample_rate: u32) -> f64 {
    len as f64 / (f64::from(sample_rate) * f64::from(CHANNELS) * f64::from(BYTES_PER_SAMPLE))
}

fn container_duration(bytes: &[u8]) -> Option<f64> {
    match hound::WavReader::new(Cursor::new(bytes)) {
        Ok(reader) => {
            let spec = reader.spec();
            (spec.sample_rate > 0)
                .then(|| f64::from(reader.duration()) / f64::from(spec.sample_rate))
        }
        Err(e) => {
            warn!(error = %e, "Unreadable WAV header, estimating duration from size");
            None
        }
    }
}
