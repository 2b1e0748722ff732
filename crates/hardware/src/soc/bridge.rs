//! The default [`Bridge`] implementation: UART, syscon, and debug CSRs wired
//! together over a shared output sink and keyboard buffer.

use std::io::Write;
use std::sync::Arc;

use crate::soc::devices::{decode_syscon_store, DebugPort, Uart, SYSCON_ADDR, UART_DATA, UART_LSR};
use crate::soc::input::InputBuffer;
use crate::soc::traits::{Bridge, MmioStore};

/// Bundles the UART, syscon, and debug-CSR handlers behind one [`Bridge`].
///
/// This is the implementation a driver reaches for by default; tests instead
/// use a `mockall`-generated mock of [`Bridge`] so they can assert exact
/// byte-for-byte console output and exact MMIO call sequences.
pub struct StdBridge {
    uart: Uart,
    debug: DebugPort,
}

impl StdBridge {
    /// Builds a bridge that writes console output to `sink` and reads
    /// keyboard bytes from the shared `input` buffer (see the concurrency
    /// model: a separate host task owns writing into `input`).
    pub fn new(sink: Box<dyn Write + Send>, input: Arc<InputBuffer>) -> Self {
        // The debug port and the UART print to the same console; each needs
        // its own handle to the sink, so callers that need a single
        // destination should wrap it in something cloneable (e.g. a shared
        // `Mutex<Vec<u8>>` adapter) before constructing two sinks from it.
        Self {
            uart: Uart::new(sink, Arc::clone(&input)),
            debug: DebugPort::new(Box::new(std::io::sink()), input),
        }
    }

    /// Builds a bridge with independent sinks for the UART and the debug
    /// print CSRs, for callers that want to route them differently (e.g. the
    /// CLI, which sends both to stdout via a shared handle).
    pub fn with_sinks(
        uart_sink: Box<dyn Write + Send>,
        debug_sink: Box<dyn Write + Send>,
        input: Arc<InputBuffer>,
    ) -> Self {
        Self {
            uart: Uart::new(uart_sink, Arc::clone(&input)),
            debug: DebugPort::new(debug_sink, input),
        }
    }
}

impl Bridge for StdBridge {
    fn load_mmio(&mut self, addr: u32) -> Option<u32> {
        match addr {
            UART_LSR => Some(self.uart.read_lsr()),
            UART_DATA => Some(self.uart.read_rbr()),
            _ => None,
        }
    }

    fn store_mmio(&mut self, addr: u32, val: u32) -> MmioStore {
        match addr {
            UART_DATA => {
                self.uart.write_thr(val);
                MmioStore::Handled
            }
            SYSCON_ADDR => decode_syscon_store(val).map_or(MmioStore::Unclaimed, MmioStore::Request),
            _ => MmioStore::Unclaimed,
        }
    }

    fn csr_write_other(&mut self, csr: u16, val: u32, ram: &[u8], ram_base: u32) {
        self.debug.write(csr, val, ram, ram_base);
    }

    fn csr_read_other(&mut self, csr: u16) -> i32 {
        self.debug.read(csr)
    }
}
