//! Real-time signal layer: per-voice oscillators and the audio ports they
//! render into.

pub mod error;
pub mod rt_processing;

pub use error::{EffectError, UserWaveError};
pub use rt_processing::audio_port::{AudioPort, BufferUsage, PortHandle};
pub use rt_processing::effects::{Effect, EffectChain, EffectProcessor, Gain, UnitEffect, is_audible};
pub use rt_processing::fx_slot::EffectSlot;
pub use rt_processing::oscillator::Oscillator;
pub use rt_processing::waveform::{NoiseSource, UserWave, WaveTable};
