//! ferrosc-bounce: offline render of an oscillator chain through an audio port.
//!
//! Runs the same per-period cycle a live engine would (update, effects,
//! next period) without any audio device, and writes the result to WAV.
//!
//! Usage:
//!   ferrosc-bounce out.wav --shape saw --freq 220
//!   ferrosc-bounce out.wav --shape sine --sub-shape sine --sub-freq 330 --algo fm
//!   ferrosc-bounce out.wav --shape user-defined --user-wave cycle.wav --config engine.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ferrosc_backend::{AudioPort, BufferUsage, EffectChain, Gain, Oscillator, UserWave};
use ferrosc_core::{EngineConfig, MASTER_FX_CHANNEL, ModulationAlgo, OscillatorParams, WaveShape};
use tracing_subscriber::EnvFilter;

/// Render an oscillator chain into a stereo WAV file
#[derive(Parser)]
#[command(name = "ferrosc-bounce")]
#[command(version)]
struct Cli {
    /// Output WAV path
    output: PathBuf,

    /// Engine config JSON (sample rate, frames per period)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Override the configured frames per period
    #[arg(long)]
    frames: Option<usize>,

    /// Carrier wave shape
    #[arg(long, default_value_t = WaveShape::Saw)]
    shape: WaveShape,

    /// Carrier frequency in Hz
    #[arg(long, default_value_t = 220.0)]
    freq: f32,

    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    /// Wave shape of the sub-oscillator; none renders the carrier alone
    #[arg(long)]
    sub_shape: Option<WaveShape>,

    #[arg(long, default_value_t = 110.0)]
    sub_freq: f32,

    #[arg(long, default_value_t = 0.5)]
    sub_volume: f32,

    /// How the sub-oscillator modulates the carrier (pm, am, mix, sync, fm)
    #[arg(long, default_value_t = ModulationAlgo::PhaseModulation)]
    algo: ModulationAlgo,

    /// Single-cycle WAV used by the user-defined shape
    #[arg(long)]
    user_wave: Option<PathBuf>,

    /// Render length in seconds
    #[arg(long, default_value_t = 2.0)]
    seconds: f32,

    /// Output gain applied by the port's effect chain
    #[arg(long, default_value_t = 1.0)]
    gain: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = engine_config(&cli)?;
    let sample_rate = config.sample_rate_f32();

    let user_wave = match &cli.user_wave {
        Some(path) => UserWave::load_wav(path)
            .with_context(|| format!("loading user wave {}", path.display()))?,
        None => UserWave::empty(),
    };
    let uses_user_wave =
        cli.shape == WaveShape::UserDefined || cli.sub_shape == Some(WaveShape::UserDefined);
    if uses_user_wave && cli.user_wave.is_none() {
        tracing::warn!("user-defined shape selected without --user-wave; it will render silence");
    }

    let params = OscillatorParams::new(cli.shape, cli.freq)
        .with_volume(cli.volume)
        .with_modulation_algo(cli.algo);
    let sub_params = cli
        .sub_shape
        .map(|shape| OscillatorParams::new(shape, cli.sub_freq).with_volume(cli.sub_volume));

    let mut osc = Oscillator::new(&params, sample_rate).with_user_wave(&user_wave);
    if let Some(sub_params) = &sub_params {
        osc.set_sub_oscillator(Some(
            Oscillator::new(sub_params, sample_rate).with_user_wave(&user_wave),
        ));
    }

    let mut port = AudioPort::new("bounce", &config)
        .with_effects(EffectChain::new().with_effect(Gain::new(cli.gain)));
    port.set_next_fx_channel(MASTER_FX_CHANNEL);

    let frames = port.frames();
    let periods = (cli.seconds.max(0.0) * sample_rate / frames as f32).ceil() as usize;

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: config.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&cli.output, spec)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    tracing::info!(
        shape = %cli.shape,
        sub_shape = ?cli.sub_shape,
        algo = %cli.algo,
        sample_rate = config.sample_rate,
        frames,
        period_ms = config.period_duration_secs() * 1e3,
        periods,
        "rendering"
    );

    let mut silent_periods = 0usize;
    for _ in 0..periods {
        let buffer = port.first_buffer_mut();
        osc.update(buffer, frames, 0);
        for frame in buffer.iter_mut() {
            frame[1] = frame[0];
        }
        port.mark_written(BufferUsage::First);

        if !port.process_effects() {
            silent_periods += 1;
        }
        for frame in port.first_buffer() {
            writer.write_sample(frame[0])?;
            writer.write_sample(frame[1])?;
        }
        port.next_period();
    }
    writer.finalize().context("finalizing wav")?;

    tracing::info!(
        output = %cli.output.display(),
        periods,
        silent_periods,
        "done"
    );
    Ok(())
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(sample_rate) = cli.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(frames) = cli.frames {
        config.frames_per_period = frames;
    }
    config.validate().context("invalid engine config")?;
    Ok(config)
}
