//! Effect processing a port can run over its primary buffer.

use ferrosc_core::frame::mean_level;
use ferrosc_core::{SURROUND_CHANNELS, SurroundFrame};
use fundsp::audiounit::AudioUnit;

use crate::error::EffectError;

/// Mean level at or below which a buffer counts as silent.
pub const DEFAULT_SILENCE_GATE: f32 = 1e-5;

/// Whether `buffer` carries anything above `gate`.
#[inline]
pub fn is_audible(buffer: &[SurroundFrame], gate: f32) -> bool {
    mean_level(buffer) > gate
}

/// The capability an [`AudioPort`](super::audio_port::AudioPort) may carry.
///
/// Runs in place on the audio thread: implementations must not allocate,
/// block or panic.
pub trait EffectProcessor: Send {
    /// Process the first `frames` frames of `buffer` and report whether the
    /// result is audible.
    fn process_buffer(&mut self, buffer: &mut [SurroundFrame], frames: usize) -> bool;
}

/// A single stage of an [`EffectChain`].
pub trait Effect: Send {
    fn name(&self) -> &str;

    /// Process `buffer` in place; returns whether this stage's output is audible.
    fn process(&mut self, buffer: &mut [SurroundFrame]) -> bool;

    /// Drop any internal state (delay lines, filter memory).
    fn reset(&mut self) {}
}

/// Ordered list of effects that can be bypassed as a whole.
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
    enabled: bool,
}

impl EffectChain {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_effect(mut self, effect: impl Effect + 'static) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Effect>> {
        (index < self.effects.len()).then(|| self.effects.remove(index))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().map(|effect| effect.name())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProcessor for EffectChain {
    fn process_buffer(&mut self, buffer: &mut [SurroundFrame], frames: usize) -> bool {
        if !self.enabled || self.effects.is_empty() {
            return false;
        }
        let buffer = &mut buffer[..frames];
        let mut audible = false;
        for effect in &mut self.effects {
            audible |= effect.process(buffer);
        }
        audible
    }
}

/// Linear gain over every channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    gain: f32,
    gate: f32,
}

impl Gain {
    pub fn new(gain: f32) -> Self {
        Self {
            gain,
            gate: DEFAULT_SILENCE_GATE,
        }
    }

    pub fn with_gate(mut self, gate: f32) -> Self {
        self.gate = gate;
        self
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Effect for Gain {
    fn name(&self) -> &str {
        "gain"
    }

    fn process(&mut self, buffer: &mut [SurroundFrame]) -> bool {
        for frame in buffer.iter_mut() {
            for sample in frame.iter_mut() {
                *sample *= self.gain;
            }
        }
        is_audible(buffer, self.gate)
    }
}

/// Runs a `fundsp` unit frame by frame over the leading channels of a port buffer.
///
/// The unit must have as many outputs as inputs, at most one per surround
/// channel. Channels beyond the unit's width pass through untouched.
pub struct UnitEffect {
    unit: Box<dyn AudioUnit>,
    channels: usize,
    gate: f32,
    input: SurroundFrame,
    output: SurroundFrame,
}

impl UnitEffect {
    pub fn new(unit: Box<dyn AudioUnit>) -> Result<Self, EffectError> {
        let (inputs, outputs) = (unit.inputs(), unit.outputs());
        if inputs != outputs {
            return Err(EffectError::ChannelMismatch { inputs, outputs });
        }
        if inputs == 0 {
            return Err(EffectError::NoChannels);
        }
        if inputs > SURROUND_CHANNELS {
            return Err(EffectError::TooManyChannels {
                channels: inputs,
                max: SURROUND_CHANNELS,
            });
        }
        Ok(Self {
            unit,
            channels: inputs,
            gate: DEFAULT_SILENCE_GATE,
            input: [0.0; SURROUND_CHANNELS],
            output: [0.0; SURROUND_CHANNELS],
        })
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.unit.set_sample_rate(f64::from(sample_rate));
        self
    }

    pub fn with_gate(mut self, gate: f32) -> Self {
        self.gate = gate;
        self
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

impl Effect for UnitEffect {
    fn name(&self) -> &str {
        "fundsp-unit"
    }

    fn process(&mut self, buffer: &mut [SurroundFrame]) -> bool {
        let ch = self.channels;
        for frame in buffer.iter_mut() {
            self.input[..ch].copy_from_slice(&frame[..ch]);
            self.unit.tick(&self.input[..ch], &mut self.output[..ch]);
            frame[..ch].copy_from_slice(&self.output[..ch]);
        }
        is_audible(buffer, self.gate)
    }

    fn reset(&mut self) {
        self.unit.reset();
    }
}
