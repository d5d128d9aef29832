use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Upper bound on frames per period; port buffers are sized once from this side.
pub const MAX_FRAMES_PER_PERIOD: usize = 4096;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_FRAMES_PER_PERIOD: usize = 256;

/// Engine-wide context shared by every port and oscillator.
///
/// Fixed for the lifetime of the objects created from it: ports size their
/// buffers from `frames_per_period`, oscillators derive their phase increment
/// from `sample_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub frames_per_period: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frames_per_period: DEFAULT_FRAMES_PER_PERIOD,
        }
    }
}

impl EngineConfig {
    pub fn new(sample_rate: u32, frames_per_period: usize) -> Result<Self, ConfigError> {
        let config = Self {
            sample_rate,
            frames_per_period,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            sample_rate = config.sample_rate,
            frames_per_period = config.frames_per_period,
            "loaded engine config"
        );
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if !(1..=MAX_FRAMES_PER_PERIOD).contains(&self.frames_per_period) {
            return Err(ConfigError::InvalidPeriod(self.frames_per_period));
        }
        Ok(())
    }

    /// Sample rate as the float type used by the phase math.
    #[inline]
    pub fn sample_rate_f32(&self) -> f32 {
        self.sample_rate as f32
    }

    /// Wall-clock length of one period in seconds.
    pub fn period_duration_secs(&self) -> f64 {
        self.frames_per_period as f64 / self.sample_rate as f64
    }
}
