use crate::audio::{denoise, AudioUnit};
use crate::config::AudioConfig;
use crate::error::FormatError;
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};
use tracing::debug;

/// Canonical format every waveform is normalized to before transcription
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
pub const TARGET_CHANNELS: u16 = 1;
pub const TARGET_BITS_PER_SAMPLE: u16 = 16;

/// Canonical-format audio staged on disk for one transcription call.
///
/// Owns its staging file: dropping the waveform deletes the file, so the
/// backing storage is released on every exit path out of a processing
/// cycle (success, transcription failure, disconnect).
#[derive(Debug)]
pub struct NormalizedWaveform {
    path: TempPath,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_count: usize,
}

impl NormalizedWaveform {
    /// Location of the self-describing WAV container
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_seconds(&self) -> f64 {
        self.sample_count as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

/// Converts a raw sample buffer into a canonical mono 16 kHz 16-bit PCM
/// waveform and applies noise suppression.
///
/// The source layout (sample width, rate, channel count, endianness) is
/// configuration, not auto-detected.
#[derive(Debug, Clone)]
pub struct AudioNormalizer {
    source: AudioConfig,
}

impl AudioNormalizer {
    pub fn new(source: AudioConfig) -> Self {
        Self { source }
    }

    /// Normalize one audio unit and stage it as a WAV file.
    ///
    /// Steps, in order: byte-order correction (big-endian sources only),
    /// PCM interpretation under the configured layout, down-mix to mono,
    /// resample to 16 kHz, optional spectral noise suppression, and
    /// re-quantization to 16-bit signed samples with clipping.
    pub fn normalize(&self, unit: &AudioUnit) -> Result<NormalizedWaveform, FormatError> {
        if unit.is_empty() {
            return Err(FormatError::Empty);
        }

        let width = self.source.sample_width as usize;
        if width != 2 && width != 4 {
            return Err(FormatError::UnsupportedWidth(self.source.sample_width));
        }

        let frame = width * self.source.channels as usize;
        if unit.len() % frame != 0 {
            return Err(FormatError::Truncated {
                len: unit.len(),
                frame,
            });
        }

        let bytes = if self.source.big_endian {
            swap_sample_bytes(&unit.bytes, width)
        } else {
            unit.bytes.clone()
        };

        let samples = decode_samples(&bytes, width);
        let mono = downmix_to_mono(&samples, self.source.channels);
        let mut resampled = resample_linear(&mono, self.source.sample_rate, TARGET_SAMPLE_RATE);

        if self.source.denoise {
            resampled = denoise::reduce_noise(&resampled);
        }

        let quantized: Vec<i16> = resampled.iter().map(|&s| quantize_i16(s)).collect();

        let waveform = stage_waveform(&quantized)?;

        debug!(
            "Normalized unit {}: {} bytes in, {:.2}s at {}Hz staged to {}",
            unit.sequence,
            unit.len(),
            waveform.duration_seconds(),
            waveform.sample_rate,
            waveform.path().display()
        );

        Ok(waveform)
    }
}

/// Reverse the bytes of each fixed-width sample (big-endian correction)
fn swap_sample_bytes(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut swapped = Vec::with_capacity(bytes.len());
    for sample in bytes.chunks_exact(width) {
        swapped.extend(sample.iter().rev());
    }
    swapped
}

/// Interpret little-endian signed PCM as f32 in [-1.0, 1.0]
fn decode_samples(bytes: &[u8], width: usize) -> Vec<f32> {
    match width {
        2 => bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect(),
        4 => bytes
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32 / 2_147_483_648.0)
            .collect(),
        _ => unreachable!("width validated by normalize"),
    }
}

/// Average interleaved channels into a mono stream
fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear-interpolation resampler. Identity when rates already match.
fn resample_linear(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = src_rate as f64 / dst_rate as f64;
    let out_len = (samples.len() as f64 / ratio).floor() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let a = samples[idx.min(last)];
            let b = samples[(idx + 1).min(last)];
            a + (b - a) * frac
        })
        .collect()
}

/// Re-quantize to i16, clipping to the valid range rather than wrapping
fn quantize_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Write the canonical waveform to a temp WAV file with header metadata so
/// the transcription adapter needs no side-channel format information.
fn stage_waveform(samples: &[i16]) -> Result<NormalizedWaveform, FormatError> {
    let path = NamedTempFile::with_suffix(".wav")?.into_temp_path();

    let spec = hound::WavSpec {
        channels: TARGET_CHANNELS,
        sample_rate: TARGET_SAMPLE_RATE,
        bits_per_sample: TARGET_BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(NormalizedWaveform {
        path,
        sample_rate: TARGET_SAMPLE_RATE,
        channels: TARGET_CHANNELS,
        bits_per_sample: TARGET_BITS_PER_SAMPLE,
        sample_count: samples.len(),
    })
}
