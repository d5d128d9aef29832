//! Oscillator parameters shared between control threads and the audio thread.
//!
//! Every field is an independent lock-free cell. A control thread may rewrite
//! any of them while a block renders; the audio thread takes one
//! [`ParamSnapshot`] per block, so a block sees each value read atomically but
//! possibly a mix of old and new values across fields.

use std::fmt;
use std::str::FromStr;

use crossbeam::atomic::AtomicCell;
use serde::{Deserialize, Serialize};

/// Formula used to turn a phase into a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum WaveShape {
    #[default]
    Sine,
    Triangle,
    Saw,
    Square,
    MoogSaw,
    Exponential,
    WhiteNoise,
    UserDefined,
}

impl WaveShape {
    pub const ALL: [WaveShape; 8] = [
        WaveShape::Sine,
        WaveShape::Triangle,
        WaveShape::Saw,
        WaveShape::Square,
        WaveShape::MoogSaw,
        WaveShape::Exponential,
        WaveShape::WhiteNoise,
        WaveShape::UserDefined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Triangle => "triangle",
            WaveShape::Saw => "saw",
            WaveShape::Square => "square",
            WaveShape::MoogSaw => "moog-saw",
            WaveShape::Exponential => "exponential",
            WaveShape::WhiteNoise => "white-noise",
            WaveShape::UserDefined => "user-defined",
        }
    }
}

/// How a sub-oscillator's output combines with its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum ModulationAlgo {
    #[default]
    PhaseModulation,
    AmplitudeModulation,
    Mix,
    Sync,
    FrequencyModulation,
}

impl ModulationAlgo {
    pub const ALL: [ModulationAlgo; 5] = [
        ModulationAlgo::PhaseModulation,
        ModulationAlgo::AmplitudeModulation,
        ModulationAlgo::Mix,
        ModulationAlgo::Sync,
        ModulationAlgo::FrequencyModulation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModulationAlgo::PhaseModulation => "pm",
            ModulationAlgo::AmplitudeModulation => "am",
            ModulationAlgo::Mix => "mix",
            ModulationAlgo::Sync => "sync",
            ModulationAlgo::FrequencyModulation => "fm",
        }
    }
}

/// Error returned when parsing an unknown shape or algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{name}`")]
pub struct ParseNameError {
    kind: &'static str,
    name: String,
}

impl FromStr for WaveShape {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveShape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError {
                kind: "wave shape",
                name: s.to_owned(),
            })
    }
}

impl FromStr for ModulationAlgo {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModulationAlgo::ALL
            .into_iter()
            .find(|algo| algo.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError {
                kind: "modulation algorithm",
                name: s.to_owned(),
            })
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ModulationAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plain copy of every parameter, taken once per rendered block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub wave_shape: WaveShape,
    pub modulation_algo: ModulationAlgo,
    /// Hz
    pub frequency: f32,
    /// Frequency ratio; 1.0 leaves the pitch untouched.
    pub detuning: f32,
    /// Cycles, added to the running phase.
    pub phase_offset: f32,
    pub volume: f32,
}

impl ParamSnapshot {
    /// Phase advance per sample at `sample_rate`.
    #[inline]
    pub fn phase_increment(&self, sample_rate: f32) -> f32 {
        self.frequency * self.detuning / sample_rate
    }
}

/// Externally owned parameter block an oscillator reads from.
///
/// Oscillators only borrow this; the owner (an instrument, a UI model) keeps
/// it alive for at least as long as any oscillator reading it.
pub struct OscillatorParams {
    wave_shape: AtomicCell<WaveShape>,
    modulation_algo: AtomicCell<ModulationAlgo>,
    frequency: AtomicCell<f32>,
    detuning: AtomicCell<f32>,
    phase_offset: AtomicCell<f32>,
    volume: AtomicCell<f32>,
}

impl OscillatorParams {
    pub fn new(wave_shape: WaveShape, frequency: f32) -> Self {
        Self {
            wave_shape: AtomicCell::new(wave_shape),
            modulation_algo: AtomicCell::new(ModulationAlgo::default()),
            frequency: AtomicCell::new(frequency),
            detuning: AtomicCell::new(1.0),
            phase_offset: AtomicCell::new(0.0),
            volume: AtomicCell::new(1.0),
        }
    }

    pub fn with_modulation_algo(self, algo: ModulationAlgo) -> Self {
        self.modulation_algo.store(algo);
        self
    }

    pub fn with_detuning(self, detuning: f32) -> Self {
        self.detuning.store(detuning);
        self
    }

    pub fn with_phase_offset(self, phase_offset: f32) -> Self {
        self.phase_offset.store(phase_offset);
        self
    }

    pub fn with_volume(self, volume: f32) -> Self {
        self.volume.store(volume);
        self
    }

    /// Read every cell once. Called by the audio thread at block start.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            wave_shape: self.wave_shape.load(),
            modulation_algo: self.modulation_algo.load(),
            frequency: self.frequency.load(),
            detuning: self.detuning.load(),
            phase_offset: self.phase_offset.load(),
            volume: self.volume.load(),
        }
    }

    // Setters take &self: they are called from control threads.

    pub fn set_wave_shape(&self, shape: WaveShape) {
        self.wave_shape.store(shape);
    }

    pub fn set_modulation_algo(&self, algo: ModulationAlgo) {
        self.modulation_algo.store(algo);
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.frequency.store(frequency);
    }

    pub fn set_detuning(&self, detuning: f32) {
        self.detuning.store(detuning);
    }

    pub fn set_phase_offset(&self, phase_offset: f32) {
        self.phase_offset.store(phase_offset);
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.store(volume);
    }

    pub fn wave_shape(&self) -> WaveShape {
        self.wave_shape.load()
    }

    pub fn modulation_algo(&self) -> ModulationAlgo {
        self.modulation_algo.load()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.load()
    }

    pub fn detuning(&self) -> f32 {
        self.detuning.load()
    }

    pub fn phase_offset(&self) -> f32 {
        self.phase_offset.load()
    }

    pub fn volume(&self) -> f32 {
        self.volume.load()
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self::new(WaveShape::default(), 440.0)
    }
}

impl fmt::Debug for OscillatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OscillatorParams")
            .field(&self.snapshot())
            .finish()
    }
}
