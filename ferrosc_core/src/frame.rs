use dasp::Frame;

/// Channels carried by a per-voice port buffer.
pub const SURROUND_CHANNELS: usize = 4;

/// Channels of a plain stereo frame.
pub const DEFAULT_CHANNELS: usize = 2;

/// One frame of a port buffer.
pub type SurroundFrame = [f32; SURROUND_CHANNELS];

/// One stereo frame.
pub type SampleFrame = [f32; DEFAULT_CHANNELS];

/// Downstream mixing bus identifier. Interpreted by the mixer only.
pub type FxChannel = i32;

/// The port is not routed anywhere.
pub const NO_FX_CHANNEL: FxChannel = -1;

/// The port feeds the master bus.
pub const MASTER_FX_CHANNEL: FxChannel = 0;

/// Zero every frame of `buffer`.
#[inline]
pub fn clear<F: Frame>(buffer: &mut [F]) {
    buffer.fill(F::EQUILIBRIUM);
}

/// Mean absolute sample value across all channels of `buffer`.
///
/// Returns 0.0 for an empty buffer.
pub fn mean_level<const N: usize>(buffer: &[[f32; N]]) -> f32 {
    if buffer.is_empty() || N == 0 {
        return 0.0;
    }
    let sum: f32 = buffer
        .iter()
        .flat_map(|frame| frame.iter())
        .map(|s| s.abs())
        .sum();
    sum / (buffer.len() * N) as f32
}
