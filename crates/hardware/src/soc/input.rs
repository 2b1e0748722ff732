//! The single-byte keyboard handoff buffer described in the concurrency model.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// A one-byte mailbox between a host input-polling task and the interpreter.
///
/// The producer (host) only ever transitions `present` from `false` to `true`;
/// the consumer (interpreter, via [`InputBuffer::take`]) only ever transitions
/// it from `true` to `false`. That discipline means plain atomic loads/stores
/// are sufficient — no mutex is needed, matching the concurrency model's claim
/// that this is "simple enough to be made safe" without general locking.
#[derive(Debug, Default)]
pub struct InputBuffer {
    byte: AtomicU8,
    present: AtomicBool,
}

impl InputBuffer {
    /// A shareable, empty buffer.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Called by the host input task: deposits a byte if the buffer is empty.
    /// Returns `false` if a byte was already pending (the caller should retry
    /// later rather than overwrite it).
    pub fn offer(&self, byte: u8) -> bool {
        if self.present.load(Ordering::Acquire) {
            return false;
        }
        self.byte.store(byte, Ordering::Relaxed);
        self.present.store(true, Ordering::Release);
        true
    }

    /// Called by the interpreter: returns and clears the pending byte, if any.
    pub fn take(&self) -> Option<u8> {
        if !self.present.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.byte.load(Ordering::Relaxed);
        self.present.store(false, Ordering::Release);
        Some(byte)
    }

    /// Whether a byte is currently pending, without consuming it.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.present.load(Ordering::Acquire)
    }
}
