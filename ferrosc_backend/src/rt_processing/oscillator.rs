use std::fmt;

use ferrosc_core::{ModulationAlgo, OscillatorParams, ParamSnapshot, WaveShape};

use super::waveform::noise::{DEFAULT_NOISE_SEED, NoiseSource};
use super::waveform::shapes::{self, normalize_phase};
use super::waveform::user_wave::WaveTable;

/// Per-voice waveform generator with an optional modulating sub-oscillator.
///
/// Parameters are borrowed from an externally owned [`OscillatorParams`]
/// that must outlive the oscillator (and its whole sub-oscillator chain).
/// Control threads may rewrite them at any time; each `update` call reads
/// them once and renders the whole block from that snapshot.
///
/// The sub-oscillator is owned: dropping an oscillator drops its chain.
pub struct Oscillator<'p> {
    params: &'p OscillatorParams,
    sub_osc: Option<Box<Oscillator<'p>>>,
    user_wave: Option<&'p dyn WaveTable>,
    noise: NoiseSource,
    sample_rate: f32,
    /// Position within the current cycle, phase offset included. Always in [0, 1).
    phase: f32,
    /// Offset the phase was last aligned to.
    phase_offset: f32,
}

impl<'p> Oscillator<'p> {
    /// Create an oscillator reading `params`, rendering at `sample_rate` Hz.
    pub fn new(params: &'p OscillatorParams, sample_rate: f32) -> Self {
        let phase_offset = params.phase_offset();
        Self {
            params,
            sub_osc: None,
            user_wave: None,
            noise: NoiseSource::new(DEFAULT_NOISE_SEED),
            sample_rate,
            phase: normalize_phase(phase_offset),
            phase_offset,
        }
    }

    /// Attach a sub-oscillator, taking ownership of it.
    pub fn with_sub_oscillator(mut self, sub_osc: Oscillator<'p>) -> Self {
        self.sub_osc = Some(Box::new(sub_osc));
        self
    }

    pub fn with_user_wave(mut self, wave: &'p dyn WaveTable) -> Self {
        self.user_wave = Some(wave);
        self
    }

    pub fn with_noise_seed(mut self, seed: u32) -> Self {
        self.noise = NoiseSource::new(seed);
        self
    }

    pub fn set_sub_oscillator(&mut self, sub_osc: Option<Oscillator<'p>>) {
        self.sub_osc = sub_osc.map(Box::new);
    }

    /// Detach and return the sub-oscillator chain.
    pub fn take_sub_oscillator(&mut self) -> Option<Box<Oscillator<'p>>> {
        self.sub_osc.take()
    }

    pub fn sub_oscillator(&self) -> Option<&Oscillator<'p>> {
        self.sub_osc.as_deref()
    }

    pub fn sub_oscillator_mut(&mut self) -> Option<&mut Oscillator<'p>> {
        self.sub_osc.as_deref_mut()
    }

    /// Point the user-defined shape at a different table, or at none (silence).
    pub fn set_user_wave(&mut self, wave: Option<&'p dyn WaveTable>) {
        self.user_wave = wave;
    }

    pub fn params(&self) -> &'p OscillatorParams {
        self.params
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current phase in [0, 1), phase offset included.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Restart the cycle at the current phase offset, for this oscillator
    /// and every sub-oscillator below it.
    pub fn reset_phase(&mut self) {
        self.phase_offset = self.params.phase_offset();
        self.phase = normalize_phase(self.phase_offset);
        if let Some(sub) = self.sub_osc.as_deref_mut() {
            sub.reset_phase();
        }
    }

    /// Number of oscillators in this chain, this one included.
    pub fn depth(&self) -> usize {
        1 + self.sub_osc.as_ref().map_or(0, |sub| sub.depth())
    }

    /// Evaluate the current wave shape at `phase`.
    ///
    /// Pure for every shape except white noise, which draws from this
    /// oscillator's generator.
    pub fn sample(&mut self, phase: f32) -> f32 {
        match self.params.wave_shape() {
            WaveShape::Sine => shapes::sine(phase),
            WaveShape::Triangle => shapes::triangle(phase),
            WaveShape::Saw => shapes::saw(phase),
            WaveShape::Square => shapes::square(phase),
            WaveShape::MoogSaw => shapes::moog_saw(phase),
            WaveShape::Exponential => shapes::exponential(phase),
            WaveShape::WhiteNoise => self.noise.next_bipolar(),
            WaveShape::UserDefined => match self.user_wave {
                Some(wave) if wave.frames() > 0 => wave.sample_at(phase),
                _ => 0.0,
            },
        }
    }

    /// Render `frames` samples into `channel` of `buffer`.
    ///
    /// With a sub-oscillator the selected modulation algorithm decides how
    /// the two combine; without one every algorithm renders the plain wave.
    ///
    /// Real-time safe: no allocation, no locks. Panics if `frames` exceeds
    /// the buffer or `channel` is not below `N`.
    pub fn update<const N: usize>(&mut self, buffer: &mut [[f32; N]], frames: usize, channel: usize) {
        let buffer = &mut buffer[..frames];
        let params = self.params.snapshot();
        self.recalc_phase(params.phase_offset);

        // Resolve the shape once; the per-sample loops are monomorphized per formula.
        match params.wave_shape {
            WaveShape::Sine => self.render(buffer, channel, &params, shapes::sine),
            WaveShape::Triangle => self.render(buffer, channel, &params, shapes::triangle),
            WaveShape::Saw => self.render(buffer, channel, &params, shapes::saw),
            WaveShape::Square => self.render(buffer, channel, &params, shapes::square),
            WaveShape::MoogSaw => self.render(buffer, channel, &params, shapes::moog_saw),
            WaveShape::Exponential => self.render(buffer, channel, &params, shapes::exponential),
            WaveShape::WhiteNoise => {
                let mut noise = self.noise;
                self.render(buffer, channel, &params, |_| noise.next_bipolar());
                self.noise = noise;
            }
            WaveShape::UserDefined => match self.user_wave.filter(|wave| wave.frames() > 0) {
                Some(wave) => self.render(buffer, channel, &params, |phase| wave.sample_at(phase)),
                None => self.render(buffer, channel, &params, |_| 0.0),
            },
        }
    }

    fn render<const N: usize, F>(
        &mut self,
        buffer: &mut [[f32; N]],
        channel: usize,
        params: &ParamSnapshot,
        shape: F,
    ) where
        F: FnMut(f32) -> f32,
    {
        let inc = params.phase_increment(self.sample_rate);
        let volume = params.volume;
        let frames = buffer.len();

        let Some(sub) = self.sub_osc.as_deref_mut() else {
            self.phase = render_plain(buffer, channel, self.phase, inc, volume, shape);
            return;
        };

        self.phase = match params.modulation_algo {
            ModulationAlgo::PhaseModulation => {
                sub.update(buffer, frames, channel);
                render_pm(buffer, channel, self.phase, inc, volume, shape)
            }
            ModulationAlgo::AmplitudeModulation => {
                sub.update(buffer, frames, channel);
                render_am(buffer, channel, self.phase, inc, volume, shape)
            }
            ModulationAlgo::Mix => {
                sub.update(buffer, frames, channel);
                render_mix(buffer, channel, self.phase, inc, volume, shape)
            }
            ModulationAlgo::Sync => render_sync(sub, buffer, channel, self.phase, inc, volume),
            ModulationAlgo::FrequencyModulation => {
                sub.update(buffer, frames, channel);
                render_fm(buffer, channel, self.phase, inc, volume, shape)
            }
        };
    }

    /// Follow a changed phase offset without losing the running position,
    /// then wrap into [0, 1).
    #[inline]
    fn recalc_phase(&mut self, phase_offset: f32) {
        if self.phase_offset != phase_offset {
            self.phase += phase_offset - self.phase_offset;
            self.phase_offset = phase_offset;
        }
        self.phase = normalize_phase(self.phase);
    }

    /// Restart the cycle at a sync point that lies `remaining` of a sample
    /// interval before the next sample.
    #[inline]
    fn hard_sync(&mut self, remaining: f32) {
        let inc = self.params.snapshot().phase_increment(self.sample_rate);
        self.phase = normalize_phase(self.phase_offset + remaining * inc);
    }
}

impl fmt::Debug for Oscillator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oscillator")
            .field("params", self.params)
            .field("phase", &self.phase)
            .field("phase_offset", &self.phase_offset)
            .field("sample_rate", &self.sample_rate)
            .field("user_wave_frames", &self.user_wave.map(|wave| wave.frames()))
            .field("sub_osc", &self.sub_osc)
            .finish()
    }
}

#[inline(always)]
fn advance(phase: f32, inc: f32) -> f32 {
    normalize_phase(phase + inc)
}

fn render_plain<const N: usize>(
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
    mut shape: impl FnMut(f32) -> f32,
) -> f32 {
    for frame in buffer.iter_mut() {
        frame[channel] = shape(phase) * volume;
        phase = advance(phase, inc);
    }
    phase
}

// The sub-oscillator's output, already in the buffer, offsets the read position.
fn render_pm<const N: usize>(
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
    mut shape: impl FnMut(f32) -> f32,
) -> f32 {
    for frame in buffer.iter_mut() {
        frame[channel] = shape(phase + frame[channel]) * volume;
        phase = advance(phase, inc);
    }
    phase
}

fn render_am<const N: usize>(
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
    mut shape: impl FnMut(f32) -> f32,
) -> f32 {
    for frame in buffer.iter_mut() {
        frame[channel] *= shape(phase) * volume;
        phase = advance(phase, inc);
    }
    phase
}

fn render_mix<const N: usize>(
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
    mut shape: impl FnMut(f32) -> f32,
) -> f32 {
    for frame in buffer.iter_mut() {
        frame[channel] += shape(phase) * volume;
        phase = advance(phase, inc);
    }
    phase
}

// Unlike PM, the offset is accumulated into the running phase.
fn render_fm<const N: usize>(
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
    mut shape: impl FnMut(f32) -> f32,
) -> f32 {
    for frame in buffer.iter_mut() {
        phase = advance(phase, frame[channel]);
        frame[channel] = shape(phase) * volume;
        phase = advance(phase, inc);
    }
    phase
}

/// Hard sync: this oscillator is the master clock, the sub-oscillator is
/// the audible slave.
///
/// The sub-oscillator renders in segments that end at each master wrap. The
/// wrap happens at `t = (1 - phase) / inc` of the sample interval, so the
/// slave restarts from its phase offset and is then advanced by the part of
/// the interval left after the wrap.
fn render_sync<const N: usize>(
    sub: &mut Oscillator<'_>,
    buffer: &mut [[f32; N]],
    channel: usize,
    mut phase: f32,
    inc: f32,
    volume: f32,
) -> f32 {
    let frames = buffer.len();
    let mut segment_start = 0;

    for i in 0..frames {
        let next = phase + inc;
        if next >= 1.0 {
            let crossing = (1.0 - phase) / inc;
            sub.update(&mut buffer[segment_start..=i], i + 1 - segment_start, channel);
            sub.hard_sync(1.0 - crossing);
            segment_start = i + 1;
        }
        phase = normalize_phase(next);
    }
    if segment_start < frames {
        sub.update(&mut buffer[segment_start..], frames - segment_start, channel);
    }

    for frame in buffer.iter_mut() {
        frame[channel] *= volume;
    }
    phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rt_processing::waveform::user_wave::UserWave;
    use approx::assert_abs_diff_eq;
    use ferrosc_core::{SampleFrame, SurroundFrame};

    const SR: f32 = 44_100.0;

    fn render_block(osc: &mut Oscillator<'_>, frames: usize) -> Vec<f32> {
        let mut buffer = vec![[0.0f32; 2]; frames];
        osc.update(&mut buffer, frames, 0);
        buffer.iter().map(|frame| frame[0]).collect()
    }

    #[test]
    fn sine_440_scenario() {
        let params = OscillatorParams::new(WaveShape::Sine, 440.0);
        let mut osc = Oscillator::new(&params, SR);
        let out = render_block(&mut osc, 100);

        assert_eq!(out[0], 0.0);
        let expected = (100.0 * 440.0 / 44_100.0f32).fract();
        assert_abs_diff_eq!(osc.phase(), expected, epsilon = 1e-4);
        assert_abs_diff_eq!(osc.phase(), 0.997_732, epsilon = 1e-4);
    }

    #[test]
    fn valid_sine() {
        let params = OscillatorParams::new(WaveShape::Sine, 440.0);
        let mut osc = Oscillator::new(&params, SR);
        let out = render_block(&mut osc, 128);

        // sample n should be sin(2pi f n / sr)
        for n in [1usize, 12, 50, 127] {
            let expected = (std::f32::consts::TAU * 440.0 * n as f32 / SR).sin();
            assert_abs_diff_eq!(out[n], expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn phase_advance_matches_closed_form_across_blocks() {
        let params = OscillatorParams::new(WaveShape::Saw, 1234.5);
        let mut osc = Oscillator::new(&params, SR);
        let mut buffer = vec![[0.0f32; 4]; 64];
        for _ in 0..10 {
            osc.update(&mut buffer, 64, 3);
        }
        let expected = (640.0f64 * 1234.5 / 44_100.0).fract() as f32;
        assert_abs_diff_eq!(osc.phase(), expected, epsilon = 1e-4);
        assert!((0.0..1.0).contains(&osc.phase()));
    }

    #[test]
    fn detuning_scales_increment() {
        let params = OscillatorParams::new(WaveShape::Saw, 100.0).with_detuning(2.0);
        let mut osc = Oscillator::new(&params, 1000.0);
        render_block(&mut osc, 3);
        assert_abs_diff_eq!(osc.phase(), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn volume_scales_output() {
        let params = OscillatorParams::new(WaveShape::Square, 125.0).with_volume(0.25);
        let mut osc = Oscillator::new(&params, 1000.0);
        let out = render_block(&mut osc, 8);
        assert_eq!(&out[..5], &[0.25, 0.25, 0.25, 0.25, 0.25]);
        assert_eq!(&out[5..], &[-0.25, -0.25, -0.25]);
    }

    #[test]
    fn only_target_channel_is_written() {
        let params = OscillatorParams::new(WaveShape::Square, 100.0);
        let mut osc = Oscillator::new(&params, 1000.0);
        let mut buffer: Vec<SurroundFrame> = vec![[9.0; 4]; 8];
        osc.update(&mut buffer, 4, 2);
        for (i, frame) in buffer.iter().enumerate() {
            assert_eq!(frame[0], 9.0);
            assert_eq!(frame[1], 9.0);
            assert_eq!(frame[3], 9.0);
            if i < 4 {
                assert_eq!(frame[2], 1.0);
            } else {
                assert_eq!(frame[2], 9.0, "frames beyond the count stay untouched");
            }
        }
    }

    #[test]
    fn phase_offset_shifts_start_and_follows_changes() {
        let params = OscillatorParams::new(WaveShape::Saw, 0.0).with_phase_offset(0.25);
        let mut osc = Oscillator::new(&params, 1000.0);
        assert_eq!(render_block(&mut osc, 1)[0], -0.5);

        params.set_phase_offset(0.75);
        assert_eq!(render_block(&mut osc, 1)[0], 0.5);
        assert_abs_diff_eq!(osc.phase(), 0.75, epsilon = 1e-6);
    }

    #[test]
    fn reset_phase_restarts_chain() {
        let sub_params = OscillatorParams::new(WaveShape::Sine, 30.0).with_volume(0.0);
        let params = OscillatorParams::new(WaveShape::Saw, 70.0)
            .with_phase_offset(0.5)
            .with_modulation_algo(ModulationAlgo::Mix);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        render_block(&mut osc, 7);
        osc.reset_phase();
        assert_eq!(osc.phase(), 0.5);
        assert_eq!(osc.sub_oscillator().unwrap().phase(), 0.0);
    }

    #[test]
    fn pm_with_silent_sub_matches_plain_output() {
        let plain_params = OscillatorParams::new(WaveShape::Sine, 523.0).with_volume(0.8);
        let mut plain = Oscillator::new(&plain_params, SR);

        let sub_params = OscillatorParams::new(WaveShape::Saw, 97.0).with_volume(0.0);
        let params = OscillatorParams::new(WaveShape::Sine, 523.0)
            .with_volume(0.8)
            .with_modulation_algo(ModulationAlgo::PhaseModulation);
        let mut modulated = Oscillator::new(&params, SR)
            .with_sub_oscillator(Oscillator::new(&sub_params, SR));

        for _ in 0..4 {
            assert_eq!(render_block(&mut plain, 256), render_block(&mut modulated, 256));
        }
    }

    #[test]
    fn pm_offsets_read_position() {
        // constant sub output of +0.25 cycles via a square at phase 0
        let sub_params = OscillatorParams::new(WaveShape::Square, 0.0).with_volume(0.25);
        let params = OscillatorParams::new(WaveShape::Saw, 0.0)
            .with_modulation_algo(ModulationAlgo::PhaseModulation);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 4);
        assert!(out.iter().all(|&s| s == shapes::saw(0.25)));
        assert_eq!(osc.phase(), 0.0, "PM must not move the carrier's own phase");
    }

    #[test]
    fn am_multiplies_with_sub() {
        let sub_params = OscillatorParams::new(WaveShape::Square, 125.0).with_volume(0.5);
        let params = OscillatorParams::new(WaveShape::Saw, 250.0)
            .with_modulation_algo(ModulationAlgo::AmplitudeModulation);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 8);
        let carrier = [-1.0, -0.5, 0.0, 0.5, -1.0, -0.5, 0.0, 0.5];
        let modulator = [0.5, 0.5, 0.5, 0.5, 0.5, -0.5, -0.5, -0.5];
        for i in 0..8 {
            assert_abs_diff_eq!(out[i], carrier[i] * modulator[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn mix_sums_both_voices() {
        let sub_params = OscillatorParams::new(WaveShape::Square, 0.0).with_volume(0.5);
        let params = OscillatorParams::new(WaveShape::Triangle, 250.0)
            .with_volume(0.5)
            .with_modulation_algo(ModulationAlgo::Mix);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 4);
        assert_eq!(out, vec![0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn fm_accumulates_into_phase() {
        // sub emits a constant 0.1 cycles each sample
        let sub_params = OscillatorParams::new(WaveShape::Square, 0.0).with_volume(0.1);
        let params = OscillatorParams::new(WaveShape::Saw, 200.0)
            .with_modulation_algo(ModulationAlgo::FrequencyModulation);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 3);
        // effective increment 0.3 per sample, first read already offset by 0.1
        for (i, &s) in out.iter().enumerate() {
            assert_abs_diff_eq!(s, shapes::saw(0.1 + 0.3 * i as f32), epsilon = 1e-5);
        }
        assert_abs_diff_eq!(osc.phase(), 0.9, epsilon = 1e-5);
    }

    #[test]
    fn sync_resets_sub_on_whole_sample_wrap() {
        let sub_params = OscillatorParams::new(WaveShape::Saw, 100.0);
        let params = OscillatorParams::new(WaveShape::Sine, 250.0)
            .with_modulation_algo(ModulationAlgo::Sync);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 12);
        let cycle = [-1.0, -0.8, -0.6, -0.4];
        for (i, &s) in out.iter().enumerate() {
            assert_abs_diff_eq!(s, cycle[i % 4], epsilon = 1e-5);
        }
    }

    #[test]
    fn sync_reset_lands_at_fractional_crossing() {
        let sub_params = OscillatorParams::new(WaveShape::Saw, 100.0);
        let params = OscillatorParams::new(WaveShape::Sine, 300.0)
            .with_volume(0.5)
            .with_modulation_algo(ModulationAlgo::Sync);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let out = render_block(&mut osc, 5);

        // master phases 0, .3, .6, .9 -> wraps a third of the way to sample 4
        for i in 0..4 {
            assert_abs_diff_eq!(out[i], 0.5 * shapes::saw(0.1 * i as f32), epsilon = 1e-5);
        }
        let slave_phase = (2.0 / 3.0) * 0.1;
        assert_abs_diff_eq!(out[4], 0.5 * shapes::saw(slave_phase), epsilon = 1e-4);
        assert_abs_diff_eq!(osc.phase(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn sync_state_carries_across_blocks() {
        let sub_params = OscillatorParams::new(WaveShape::Saw, 100.0);
        let params = OscillatorParams::new(WaveShape::Sine, 250.0)
            .with_modulation_algo(ModulationAlgo::Sync);
        let mut osc = Oscillator::new(&params, 1000.0)
            .with_sub_oscillator(Oscillator::new(&sub_params, 1000.0));
        let mut out = render_block(&mut osc, 3);
        out.extend(render_block(&mut osc, 5));
        let cycle = [-1.0, -0.8, -0.6, -0.4];
        for (i, &s) in out.iter().enumerate() {
            assert_abs_diff_eq!(s, cycle[i % 4], epsilon = 1e-5);
        }
    }

    #[test]
    fn algorithms_fall_back_without_sub() {
        for algo in ModulationAlgo::ALL {
            let plain_params = OscillatorParams::new(WaveShape::Triangle, 330.0);
            let params = OscillatorParams::new(WaveShape::Triangle, 330.0).with_modulation_algo(algo);
            let mut plain = Oscillator::new(&plain_params, SR);
            let mut osc = Oscillator::new(&params, SR);
            assert_eq!(render_block(&mut plain, 64), render_block(&mut osc, 64), "{algo}");
        }
    }

    #[test]
    fn chains_recurse_through_grandchildren() {
        let grand = OscillatorParams::new(WaveShape::Sine, 3.0).with_volume(0.0);
        let child = OscillatorParams::new(WaveShape::Square, 0.0)
            .with_volume(0.5)
            .with_modulation_algo(ModulationAlgo::Mix);
        let root = OscillatorParams::new(WaveShape::Saw, 0.0)
            .with_modulation_algo(ModulationAlgo::AmplitudeModulation);
        let mut osc = Oscillator::new(&root, 1000.0).with_sub_oscillator(
            Oscillator::new(&child, 1000.0).with_sub_oscillator(Oscillator::new(&grand, 1000.0)),
        );
        assert_eq!(osc.depth(), 3);
        // (0 + 0.5) * saw(0)
        assert!(render_block(&mut osc, 4).iter().all(|&s| s == -0.5));

        let taken = osc.take_sub_oscillator().unwrap();
        assert_eq!(taken.depth(), 2);
        assert_eq!(osc.depth(), 1);
    }

    #[test]
    fn noise_is_seeded_per_oscillator() {
        let params = OscillatorParams::new(WaveShape::WhiteNoise, 440.0);
        let mut a = Oscillator::new(&params, SR).with_noise_seed(7);
        let mut b = Oscillator::new(&params, SR).with_noise_seed(7);
        let mut c = Oscillator::new(&params, SR).with_noise_seed(8);
        let out_a = render_block(&mut a, 512);
        assert_eq!(out_a, render_block(&mut b, 512));
        assert_ne!(out_a, render_block(&mut c, 512));
        assert!(out_a.iter().all(|s| (-1.0..=1.0).contains(s)));
        // the generator keeps running across blocks
        assert_ne!(out_a, render_block(&mut a, 512));
    }

    #[test]
    fn user_wave_renders_table() {
        let wave = UserWave::new(vec![0.0, 1.0, 0.0, -1.0]);
        let params = OscillatorParams::new(WaveShape::UserDefined, 250.0);
        let mut osc = Oscillator::new(&params, 1000.0).with_user_wave(&wave);
        assert_eq!(render_block(&mut osc, 5), vec![0.0, 1.0, 0.0, -1.0, 0.0]);
    }

    #[test]
    fn empty_or_missing_user_wave_is_silent() {
        let empty = UserWave::empty();
        let params = OscillatorParams::new(WaveShape::UserDefined, 440.0);
        let mut with_empty = Oscillator::new(&params, SR).with_user_wave(&empty);
        let mut without = Oscillator::new(&params, SR);

        let mut buffer: Vec<SampleFrame> = vec![[0.3; 2]; 32];
        with_empty.update(&mut buffer, 32, 1);
        assert!(buffer.iter().all(|frame| frame[1] == 0.0 && frame[0] == 0.3));
        assert!(render_block(&mut without, 32).iter().all(|&s| s == 0.0));

        for i in 0..16 {
            assert_eq!(with_empty.sample(i as f32 / 16.0), 0.0);
        }
    }

    #[test]
    fn sample_dispatches_on_current_shape() {
        let params = OscillatorParams::new(WaveShape::Triangle, 440.0);
        let mut osc = Oscillator::new(&params, SR);
        assert_eq!(osc.sample(0.25), 1.0);
        params.set_wave_shape(WaveShape::Saw);
        assert_eq!(osc.sample(0.0), -1.0);
        params.set_wave_shape(WaveShape::Exponential);
        assert_eq!(osc.sample(0.5), 1.0);
    }

    #[test]
    fn shape_change_takes_effect_next_block() {
        let params = OscillatorParams::new(WaveShape::Square, 0.0);
        let mut osc = Oscillator::new(&params, 1000.0);
        assert_eq!(render_block(&mut osc, 2), vec![1.0, 1.0]);
        params.set_wave_shape(WaveShape::Saw);
        assert_eq!(render_block(&mut osc, 2), vec![-1.0, -1.0]);
    }
}
