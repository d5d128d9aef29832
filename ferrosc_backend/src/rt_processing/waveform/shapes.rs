//! Closed-form wave shapes.
//!
//! Every function takes an arbitrary phase, reduces it into [0.0, 1.0) and
//! returns a value in [-1.0, 1.0]. They are pure and allocation-free.

use std::f32::consts::TAU;

/// Normalize phase to [0.0, 1.0) range to prevent accumulation errors
#[inline]
pub fn normalize_phase(phase: f32) -> f32 {
    let wrapped = phase - phase.floor();
    // -tiny - floor(-tiny) rounds to exactly 1.0 in f32
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[inline]
pub fn sine(phase: f32) -> f32 {
    (normalize_phase(phase) * TAU).sin()
}

#[inline]
pub fn triangle(phase: f32) -> f32 {
    let ph = normalize_phase(phase);
    if ph <= 0.25 {
        ph * 4.0
    } else if ph <= 0.75 {
        2.0 - ph * 4.0
    } else {
        ph * 4.0 - 4.0
    }
}

#[inline]
pub fn saw(phase: f32) -> f32 {
    -1.0 + normalize_phase(phase) * 2.0
}

#[inline]
pub fn square(phase: f32) -> f32 {
    if normalize_phase(phase) > 0.5 { -1.0 } else { 1.0 }
}

/// Asymmetric ramp: steep rise over the first half, slow fall over the second.
#[inline]
pub fn moog_saw(phase: f32) -> f32 {
    let ph = normalize_phase(phase);
    if ph < 0.5 {
        -1.0 + ph * 4.0
    } else {
        1.0 - 2.0 * ph
    }
}

#[inline]
pub fn exponential(phase: f32) -> f32 {
    let mut ph = normalize_phase(phase);
    if ph > 0.5 {
        ph = 1.0 - ph;
    }
    -1.0 + 8.0 * ph * ph
}
