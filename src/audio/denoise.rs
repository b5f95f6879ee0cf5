// Spectral noise gate.
//
// Estimates a per-bin noise floor from the quietest frames of the signal
// itself (no separate noise profile) and attenuates bins that don't rise
// above it. Overlap-add STFT with a Hann window on both analysis and
// synthesis.

use rustfft::{num_complex::Complex, FftPlanner};

const WINDOW: usize = 1024;
const HOP: usize = WINDOW / 2;

/// Fraction of frames treated as the noise floor estimate per bin
const FLOOR_QUANTILE: f32 = 0.20;
/// A bin must exceed floor * OVER_SUBTRACTION to pass ungated
const OVER_SUBTRACTION: f32 = 1.5;
/// Residual gain for gated bins, keeps the result from sounding hollow
const GAIN_FLOOR: f32 = 0.1;

/// Suppress stationary noise in a mono f32 signal. Output length equals
/// input length; inputs shorter than one analysis window pass through.
pub fn reduce_noise(samples: &[f32]) -> Vec<f32> {
    if samples.len() < WINDOW {
        return samples.to_vec();
    }

    let window = hann_window();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(WINDOW);
    let ifft = planner.plan_fft_inverse(WINDOW);

    let n_frames = (samples.len() - WINDOW) / HOP + 1;

    // Analysis pass: windowed FFT of every frame
    let mut spectra: Vec<Vec<Complex<f32>>> = Vec::with_capacity(n_frames);
    for frame in 0..n_frames {
        let start = frame * HOP;
        let mut buf: Vec<Complex<f32>> = samples[start..start + WINDOW]
            .iter()
            .zip(window.iter())
            .map(|(s, w)| Complex::new(s * w, 0.0))
            .collect();
        fft.process(&mut buf);
        spectra.push(buf);
    }

    // Per-bin noise floor: low quantile of magnitudes across frames
    let floor_index = ((n_frames as f32 * FLOOR_QUANTILE) as usize).min(n_frames - 1);
    let mut floor = vec![0.0f32; WINDOW];
    let mut magnitudes = vec![0.0f32; n_frames];
    for bin in 0..WINDOW {
        for (frame, spectrum) in spectra.iter().enumerate() {
            magnitudes[frame] = spectrum[bin].norm();
        }
        magnitudes.sort_by(|a, b| a.total_cmp(b));
        floor[bin] = magnitudes[floor_index];
    }

    // Gate, inverse transform, overlap-add
    let mut output = vec![0.0f32; samples.len()];
    let mut weight = vec![0.0f32; samples.len()];
    for (frame, spectrum) in spectra.iter_mut().enumerate() {
        for (bin, value) in spectrum.iter_mut().enumerate() {
            let mag = value.norm();
            let gain = if mag > 1e-10 {
                ((mag - floor[bin] * OVER_SUBTRACTION) / mag).clamp(GAIN_FLOOR, 1.0)
            } else {
                0.0
            };
            *value *= gain;
        }

        ifft.process(spectrum);

        let start = frame * HOP;
        for i in 0..WINDOW {
            let sample = spectrum[i].re / WINDOW as f32;
            output[start + i] += sample * window[i];
            weight[start + i] += window[i] * window[i];
        }
    }

    // Normalize by the accumulated window energy; positions never covered
    // by a full frame (the tail remainder) keep the original signal.
    for i in 0..output.len() {
        if weight[i] > 1e-8 {
            output[i] /= weight[i];
        } else {
            output[i] = samples[i];
        }
    }

    output
}

fn hann_window() -> Vec<f32> {
    (0..WINDOW)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / WINDOW as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    /// Deterministic pseudo-noise, avoids pulling in a rand dependency
    fn pseudo_noise(len: usize, amplitude: f32) -> Vec<f32> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let unit = (state >> 33) as f32 / (1u64 << 31) as f32;
                (unit - 0.5) * 2.0 * amplitude
            })
            .collect()
    }

    #[test]
    fn output_length_matches_input() {
        let input = pseudo_noise(10_000, 0.1);
        assert_eq!(reduce_noise(&input).len(), input.len());
    }

    #[test]
    fn short_input_passes_through() {
        let input = vec![0.5f32; WINDOW - 1];
        assert_eq!(reduce_noise(&input), input);
    }

    #[test]
    fn silence_stays_silent() {
        let input = vec![0.0f32; 8192];
        let output = reduce_noise(&input);
        assert!(output.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn steady_noise_is_attenuated() {
        let input = pseudo_noise(16_384, 0.2);
        let output = reduce_noise(&input);
        assert!(
            rms(&output) < rms(&input) * 0.8,
            "noise floor should be suppressed: in={} out={}",
            rms(&input),
            rms(&output)
        );
    }

    #[test]
    fn tone_bursts_survive_gating() {
        // 0.5s of near-silence, 0.5s of tone, repeated: the quiet frames set
        // the floor, so the bursts must pass mostly intact.
        let len = 32_768;
        let mut input = pseudo_noise(len, 0.005);
        for (i, sample) in input.iter_mut().enumerate() {
            let in_burst = (i / 8192) % 2 == 1;
            if in_burst {
                *sample += 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0).sin();
            }
        }
        let output = reduce_noise(&input);

        let burst_in: Vec<f32> = input[8192..16384].to_vec();
        let burst_out: Vec<f32> = output[8192..16384].to_vec();
        assert!(
            rms(&burst_out) > rms(&burst_in) * 0.5,
            "burst energy should be retained: in={} out={}",
            rms(&burst_in),
            rms(&burst_out)
        );
    }
}
