use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use dasp::Frame;
use ferrosc_core::frame::clear;
use ferrosc_core::{EngineConfig, FxChannel, NO_FX_CHANNEL, SurroundFrame};
use spin::RwLock;

use super::fx_slot::EffectSlot;

/// Which of a port's buffers were written during the current period.
///
/// Ordered: `None < First < Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BufferUsage {
    #[default]
    None,
    First,
    Both,
}

/// Port state that non-audio threads may read and write.
struct PortShared {
    name: RwLock<String>,
    ext_output_enabled: AtomicBool,
    next_fx_channel: AtomicI32,
}

impl PortShared {
    fn set_name(&self, new_name: String) {
        let mut name = self.name.write();
        let old = std::mem::replace(&mut *name, new_name);
        tracing::debug!(old = %old, new = %name.as_str(), "renamed audio port");
    }

    fn set_ext_output_enabled(&self, enabled: bool) {
        let was = self.ext_output_enabled.swap(enabled, Ordering::Relaxed);
        if was != enabled {
            tracing::debug!(port = %self.name.read().as_str(), enabled, "external output toggled");
        }
    }
}

/// Cloneable view of an [`AudioPort`]'s identification and routing state,
/// for threads that do not own the port.
///
/// Every change is visible to the audio thread by its next period without
/// the audio thread ever waiting.
#[derive(Clone)]
pub struct PortHandle {
    shared: Arc<PortShared>,
}

impl PortHandle {
    pub fn name(&self) -> String {
        self.shared.name.read().clone()
    }

    pub fn set_name(&self, new_name: impl Into<String>) {
        self.shared.set_name(new_name.into());
    }

    pub fn ext_output_enabled(&self) -> bool {
        self.shared.ext_output_enabled.load(Ordering::Relaxed)
    }

    pub fn set_ext_output_enabled(&self, enabled: bool) {
        self.shared.set_ext_output_enabled(enabled);
    }

    pub fn next_fx_channel(&self) -> FxChannel {
        self.shared.next_fx_channel.load(Ordering::Relaxed)
    }

    pub fn set_next_fx_channel(&self, channel: FxChannel) {
        self.shared.next_fx_channel.store(channel, Ordering::Relaxed);
    }
}

impl fmt::Debug for PortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortHandle")
            .field("name", &self.name())
            .field("ext_output_enabled", &self.ext_output_enabled())
            .field("next_fx_channel", &self.next_fx_channel())
            .finish()
    }
}

/// Per-voice output point: two period-sized surround buffers, an optional
/// effect processor and routing metadata for the mixer.
///
/// The buffers are allocated once at construction and never reallocated.
/// `next_period`, `process_effects` and buffer access are meant for the
/// audio thread; naming and the external-output flag may be driven from
/// elsewhere through a [`PortHandle`].
pub struct AudioPort {
    first_buffer: Box<[SurroundFrame]>,
    second_buffer: Box<[SurroundFrame]>,
    buffer_usage: BufferUsage,
    frames: usize,
    effects: Option<EffectSlot>,
    shared: Arc<PortShared>,
}

impl AudioPort {
    /// Create a port with cleared buffers sized for `config`'s period.
    ///
    /// New ports expose themselves to the external output layer and are not
    /// routed to any fx channel.
    pub fn new(name: impl Into<String>, config: &EngineConfig) -> Self {
        let frames = config.frames_per_period;
        let name = name.into();
        tracing::debug!(port = %name, frames, "created audio port");
        Self {
            first_buffer: vec![<SurroundFrame as Frame>::EQUILIBRIUM; frames].into_boxed_slice(),
            second_buffer: vec![<SurroundFrame as Frame>::EQUILIBRIUM; frames].into_boxed_slice(),
            buffer_usage: BufferUsage::None,
            frames,
            effects: None,
            shared: Arc::new(PortShared {
                name: RwLock::new(name),
                ext_output_enabled: AtomicBool::new(true),
                next_fx_channel: AtomicI32::new(NO_FX_CHANNEL),
            }),
        }
    }

    pub fn with_effects(mut self, effects: impl Into<EffectSlot>) -> Self {
        self.effects = Some(effects.into());
        self
    }

    pub fn handle(&self) -> PortHandle {
        PortHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Frames per period; the length of both buffers.
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn first_buffer(&self) -> &[SurroundFrame] {
        &self.first_buffer
    }

    #[inline]
    pub fn first_buffer_mut(&mut self) -> &mut [SurroundFrame] {
        &mut self.first_buffer
    }

    #[inline]
    pub fn second_buffer(&self) -> &[SurroundFrame] {
        &self.second_buffer
    }

    #[inline]
    pub fn second_buffer_mut(&mut self) -> &mut [SurroundFrame] {
        &mut self.second_buffer
    }

    /// Both buffers at once, for writers that spill past the period end.
    #[inline]
    pub fn buffers_mut(&mut self) -> (&mut [SurroundFrame], &mut [SurroundFrame]) {
        (&mut *self.first_buffer, &mut *self.second_buffer)
    }

    pub fn buffer_usage(&self) -> BufferUsage {
        self.buffer_usage
    }

    /// Record that buffers up to `usage` hold audio for this period.
    /// Usage only grows within a period.
    #[inline]
    pub fn mark_written(&mut self, usage: BufferUsage) {
        self.buffer_usage = self.buffer_usage.max(usage);
    }

    /// Advance to the next period.
    ///
    /// If both buffers were used, the secondary buffer's audio becomes the
    /// start of the new primary buffer and the secondary is cleared.
    /// Otherwise both are cleared. Usage returns to `None` either way.
    pub fn next_period(&mut self) {
        match self.buffer_usage {
            BufferUsage::Both => {
                self.first_buffer.copy_from_slice(&self.second_buffer);
                clear(&mut self.second_buffer[..]);
            }
            BufferUsage::First | BufferUsage::None => {
                clear(&mut self.first_buffer[..]);
                clear(&mut self.second_buffer[..]);
            }
        }
        self.buffer_usage = BufferUsage::None;
    }

    /// Run the effect processor over the primary buffer.
    ///
    /// Returns whether the result is audible. Without a processor this does
    /// nothing and returns `false`.
    #[inline]
    pub fn process_effects(&mut self) -> bool {
        match &self.effects {
            Some(slot) => slot.process_realtime(&mut self.first_buffer, self.frames),
            None => false,
        }
    }

    pub fn effects(&self) -> Option<&EffectSlot> {
        self.effects.as_ref()
    }

    pub fn has_effects(&self) -> bool {
        self.effects.is_some()
    }

    pub fn set_effects(&mut self, effects: Option<EffectSlot>) {
        self.effects = effects;
    }

    pub fn take_effects(&mut self) -> Option<EffectSlot> {
        self.effects.take()
    }

    pub fn ext_output_enabled(&self) -> bool {
        self.shared.ext_output_enabled.load(Ordering::Relaxed)
    }

    /// Whether the hardware layer should expose this port directly.
    /// Has no effect on the port's own audio path.
    pub fn set_ext_output_enabled(&self, enabled: bool) {
        self.shared.set_ext_output_enabled(enabled);
    }

    /// Next effect channel after this port (-1 = none, 0 = master).
    pub fn next_fx_channel(&self) -> FxChannel {
        self.shared.next_fx_channel.load(Ordering::Relaxed)
    }

    pub fn set_next_fx_channel(&self, channel: FxChannel) {
        self.shared.next_fx_channel.store(channel, Ordering::Relaxed);
    }

    pub fn name(&self) -> String {
        self.shared.name.read().clone()
    }

    pub fn set_name(&self, new_name: impl Into<String>) {
        self.shared.set_name(new_name.into());
    }
}

impl Drop for AudioPort {
    fn drop(&mut self) {
        tracing::debug!(port = %self.shared.name.read().as_str(), "released audio port");
    }
}

impl fmt::Debug for AudioPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPort")
            .field("name", &self.name())
            .field("frames", &self.frames)
            .field("buffer_usage", &self.buffer_usage)
            .field("ext_output_enabled", &self.ext_output_enabled())
            .field("next_fx_channel", &self.next_fx_channel())
            .field("has_effects", &self.has_effects())
            .finish()
    }
}
