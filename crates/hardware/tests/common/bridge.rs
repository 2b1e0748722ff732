//! A lightweight hand-written [`Bridge`] for tests that don't need to assert
//! exact call sequences (see [`super::mocks`] for the ones that do).

use std::sync::Arc;

use rv32ima_core::soc::devices::{SYSCON_ADDR, UART_DATA, UART_LSR};
use rv32ima_core::soc::{Bridge, InputBuffer, MmioStore, SystemRequest};

/// Records UART output bytes and decodes syscon writes, backed by a real
/// [`InputBuffer`] so keyboard-input tests exercise the same handoff path a
/// real driver uses.
#[derive(Default, Debug)]
pub struct TestBridge {
    pub output: Vec<u8>,
    pub input: Option<Arc<InputBuffer>>,
    pub debug_writes: Vec<(u16, u32)>,
}

impl TestBridge {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            input: Some(InputBuffer::shared()),
            debug_writes: Vec::new(),
        }
    }

    pub fn input(&self) -> Arc<InputBuffer> {
        self.input.clone().expect("test bridge always carries an input buffer")
    }
}

impl Bridge for TestBridge {
    fn load_mmio(&mut self, addr: u32) -> Option<u32> {
        match addr {
            UART_LSR => {
                let has_pending = self.input.as_ref().is_some_and(|i| i.has_pending());
                Some(0x60 | u32::from(has_pending))
            }
            UART_DATA => {
                let byte = self.input.as_ref().and_then(|i| i.take()).unwrap_or(0);
                Some(u32::from(byte))
            }
            _ => None,
        }
    }

    fn store_mmio(&mut self, addr: u32, val: u32) -> MmioStore {
        match addr {
            UART_DATA => {
                self.output.push(val as u8);
                MmioStore::Handled
            }
            SYSCON_ADDR => match val {
                0x5555 => MmioStore::Request(SystemRequest::PowerOff),
                0x7777 => MmioStore::Request(SystemRequest::Restart),
                _ => MmioStore::Unclaimed,
            },
            _ => MmioStore::Unclaimed,
        }
    }

    fn csr_write_other(&mut self, csr: u16, val: u32, _ram: &[u8], _ram_base: u32) {
        self.debug_writes.push((csr, val));
    }

    fn csr_read_other(&mut self, _csr: u16) -> i32 {
        -1
    }
}
