use std::path::PathBuf;

use thiserror::Error;

/// Failures while building a user wave table. Never raised on the audio thread.
#[derive(Debug, Error)]
pub enum UserWaveError {
    #[error("failed to decode wave file {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported sample width of {0} bits")]
    UnsupportedBitDepth(u16),
}

/// Failures while wrapping a processing unit as a port effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EffectError {
    #[error("effect unit has {inputs} inputs but {outputs} outputs; in-place processing needs them equal")]
    ChannelMismatch { inputs: usize, outputs: usize },

    #[error("effect unit processes {channels} channels but port frames carry {max}")]
    TooManyChannels { channels: usize, max: usize },

    #[error("effect unit has no audio channels")]
    NoChannels,
}
