//! Lock-conscious holder for a port's effect processor.
//!
//! Design goals:
//! - Avoid OS mutex/syscall on the audio thread.
//! - Allow a control thread to swap or edit the processor at any time.
//! - If the processor is busy (locked by a control thread), let the dry
//!   signal through instead of waiting.

use std::sync::Arc;

use ferrosc_core::SurroundFrame;
use spin::Mutex; // small, in-process spinning lock good for realtime callbacks

use super::effects::{DEFAULT_SILENCE_GATE, EffectProcessor, is_audible};

pub type SharedProcessor = Arc<Mutex<Box<dyn EffectProcessor>>>;

/// Hot-swappable effect processor owned by an audio port.
///
/// The audio thread only ever calls [`EffectSlot::process_realtime`], which
/// uses `try_lock`. Control threads reach the processor through
/// [`EffectSlot::handle`] clones and may spin briefly on the lock.
pub struct EffectSlot {
    processor: SharedProcessor,
}

impl EffectSlot {
    pub fn new(processor: Box<dyn EffectProcessor>) -> Self {
        Self {
            processor: Arc::new(Mutex::new(processor)),
        }
    }

    /// Replaces the current processor with a new one.
    ///
    /// Spins until the audio thread releases the lock; the swap itself is a
    /// pointer move. The old processor is dropped here, on the caller's thread.
    pub fn swap_processor(&self, new_processor: Box<dyn EffectProcessor>) -> Box<dyn EffectProcessor> {
        let old = std::mem::replace(&mut *self.processor.lock(), new_processor);
        tracing::debug!("swapped effect processor");
        old
    }

    /// Mutate the processor in place. Spins until the lock is acquired.
    pub fn with_processor_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Box<dyn EffectProcessor>) -> R,
    {
        let mut guard = self.processor.lock();
        f(&mut guard)
    }

    /// Realtime-safe entry called once per period by the owning port.
    ///
    /// Returns the processor's audibility verdict. When a control thread
    /// holds the lock the buffer is left dry and audibility is measured on it.
    ///
    /// **Important**: This method performs no heap allocation.
    pub fn process_realtime(&self, buffer: &mut [SurroundFrame], frames: usize) -> bool {
        if let Some(mut guard) = self.processor.try_lock() {
            guard.process_buffer(buffer, frames)
        } else {
            is_audible(&buffer[..frames], DEFAULT_SILENCE_GATE)
        }
    }

    /// Cloneable handle for control threads.
    pub fn handle(&self) -> SharedProcessor {
        Arc::clone(&self.processor)
    }
}

impl<P: EffectProcessor + 'static> From<P> for EffectSlot {
    fn from(processor: P) -> Self {
        Self::new(Box::new(processor))
    }
}
