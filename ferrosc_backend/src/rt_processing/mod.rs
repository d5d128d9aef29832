//! Everything that runs on the audio thread.
//!
//! `update`, `process_effects` and `next_period` never allocate, block or
//! log. Setup (constructors, table loading, effect swaps) happens elsewhere.

pub mod audio_port;
pub mod effects;
pub mod fx_slot;
pub mod oscillator;
pub mod waveform;
