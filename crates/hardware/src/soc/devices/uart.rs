//! A minimal UART: a transmit-only THR and a one-bit-of-status LSR/RBR pair.
//!
//! This is a drastically smaller model than a real 16550 — no line control,
//! no interrupt enables, no FIFOs — because the guest software this machine
//! targets only ever polls LSR and pokes THR/RBR one byte at a time.

use std::io::Write;
use std::sync::Arc;

use crate::soc::input::InputBuffer;

/// THR/RBR address.
pub const UART_DATA: u32 = 0x1000_0000;
/// LSR address.
pub const UART_LSR: u32 = 0x1000_0005;

const LSR_TX_IDLE: u32 = 0x60;

/// The UART device: a byte sink for guest output and a handle to the shared
/// keyboard buffer for guest input.
pub struct Uart {
    sink: Box<dyn Write + Send>,
    input: Arc<InputBuffer>,
}

impl Uart {
    /// Builds a UART that writes to `sink` and reads keyboard bytes from `input`.
    pub fn new(sink: Box<dyn Write + Send>, input: Arc<InputBuffer>) -> Self {
        Self { sink, input }
    }

    /// THR store: emits the low byte of `val` as a console byte.
    pub fn write_thr(&mut self, val: u32) {
        let byte = [val as u8];
        // Best-effort: a closed stdout should not take down the guest.
        let _ = self.sink.write_all(&byte);
        let _ = self.sink.flush();
    }

    /// LSR load: bits 6/5 (THR empty, data ready) always set, bit 0 is kbhit.
    #[must_use]
    pub fn read_lsr(&self) -> u32 {
        LSR_TX_IDLE | u32::from(self.input.has_pending())
    }

    /// RBR load: the next pending input byte, or 0 if none.
    pub fn read_rbr(&self) -> u32 {
        u32::from(self.input.take().unwrap_or(0))
    }
}
