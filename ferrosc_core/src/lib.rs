//! Shared vocabulary for the ferrosc signal layer.
//!
//! Everything in here is safe to touch from any thread: frame layouts, the
//! engine configuration, and the parameter cells that control threads write
//! while the audio thread renders.

pub mod config;
pub mod error;
pub mod frame;
pub mod params;

pub use config::EngineConfig;
pub use error::ConfigError;
pub use frame::{
    DEFAULT_CHANNELS, FxChannel, MASTER_FX_CHANNEL, NO_FX_CHANNEL, SURROUND_CHANNELS, SampleFrame,
    SurroundFrame,
};
pub use params::{ModulationAlgo, OscillatorParams, ParamSnapshot, ParseNameError, WaveShape};
