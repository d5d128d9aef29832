use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed engine config")]
    Parse(#[from] serde_json::Error),

    #[error("sample rate {0} Hz is outside {min}..={max} Hz", min = crate::config::MIN_SAMPLE_RATE, max = crate::config::MAX_SAMPLE_RATE)]
    InvalidSampleRate(u32),

    #[error("period of {0} frames is outside 1..={max} frames", max = crate::config::MAX_FRAMES_PER_PERIOD)]
    InvalidPeriod(usize),
}
