//! Sampled waveforms for the user-defined wave shape.

use std::path::Path;

use crate::error::UserWaveError;
use crate::rt_processing::waveform::shapes::normalize_phase;

/// A single-cycle waveform sourced from data rather than a formula.
///
/// Implementors are owned outside the oscillator and only borrowed by it.
/// Zero frames is a valid state that the oscillator renders as silence.
pub trait WaveTable: Send + Sync {
    /// Number of frames in one cycle.
    fn frames(&self) -> usize;

    /// Sample at `phase` (any value, reduced into one cycle).
    ///
    /// Only called when `frames() > 0`.
    fn sample_at(&self, phase: f32) -> f32;
}

/// Mono single-cycle table with linear interpolation between frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserWave {
    samples: Vec<f32>,
}

impl UserWave {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// A table with no frames; renders as silence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tabulate `f` at `frames` evenly spaced phases in [0.0, 1.0).
    pub fn from_fn(frames: usize, f: impl Fn(f32) -> f32) -> Self {
        let samples = (0..frames)
            .map(|i| f(i as f32 / frames as f32))
            .collect();
        Self { samples }
    }

    /// Load the first channel of a WAV file as one waveform cycle.
    ///
    /// Integer samples are scaled into [-1.0, 1.0].
    pub fn load_wav(path: impl AsRef<Path>) -> Result<Self, UserWaveError> {
        let path = path.as_ref();
        let decode_err = |source| UserWaveError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(decode_err)?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .step_by(channels)
                .collect::<Result<Vec<_>, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(UserWaveError::UnsupportedBitDepth(spec.bits_per_sample));
                }
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .step_by(channels)
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(decode_err)?
            }
        };

        tracing::debug!(
            path = %path.display(),
            frames = samples.len(),
            sample_rate = spec.sample_rate,
            "loaded user wave"
        );
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl WaveTable for UserWave {
    fn frames(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    fn sample_at(&self, phase: f32) -> f32 {
        let frames = self.samples.len();
        let position = normalize_phase(phase) * frames as f32;
        // position can round up to `frames` for phases just below 1.0
        let index = (position as usize).min(frames - 1);
        let frac = position - index as f32;

        let sample1 = self.samples[index];
        let sample2 = self.samples[(index + 1) % frames];

        // Linear interpolation for smooth transitions
        sample1 + frac * (sample2 - sample1)
    }
}
