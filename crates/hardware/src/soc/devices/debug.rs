//! The vendor-range debug CSRs: direct print/read hooks for guest software
//! that has no UART driver yet (e.g. very early boot code).

use std::io::Write;
use std::sync::Arc;

use crate::soc::input::InputBuffer;

/// Prints `val` as a decimal integer.
pub const CSR_PRINT_DEC: u16 = 0x136;
/// Prints `val` as eight hex digits.
pub const CSR_PRINT_HEX8: u16 = 0x137;
/// Treats `val` as a guest pointer to a NUL-terminated string and prints it.
pub const CSR_PRINT_STR: u16 = 0x138;
/// Prints `val` as a single byte.
pub const CSR_PRINT_BYTE: u16 = 0x139;
/// Reads the next pending input byte, or `-1`.
pub const CSR_READ_BYTE: u16 = 0x140;

/// The longest string this CSR will print before giving up, guarding against
/// a guest pointer into memory with no NUL terminator.
const MAX_STRING_LEN: usize = 4096;

/// Backing state for the debug CSRs: an output sink and the shared keyboard
/// buffer (the same one the UART reads from — both are "the guest's console").
pub struct DebugPort {
    sink: Box<dyn Write + Send>,
    input: Arc<InputBuffer>,
}

impl DebugPort {
    /// Builds a debug port writing to `sink`, reading input from `input`.
    pub fn new(sink: Box<dyn Write + Send>, input: Arc<InputBuffer>) -> Self {
        Self { sink, input }
    }

    /// Dispatches a write to one of the four print CSRs. A CSR number outside
    /// that set is silently ignored (delegation stops here).
    pub fn write(&mut self, csr: u16, val: u32, ram: &[u8], ram_base: u32) {
        match csr {
            CSR_PRINT_DEC => self.print(format!("{val}")),
            CSR_PRINT_HEX8 => self.print(format!("{val:08x}")),
            CSR_PRINT_STR => self.print_guest_string(val, ram, ram_base),
            CSR_PRINT_BYTE => {
                let _ = self.sink.write_all(&[val as u8]);
                let _ = self.sink.flush();
            }
            _ => {}
        }
    }

    /// Dispatches a read from the input CSR; `-1` for any other CSR number.
    pub fn read(&mut self, csr: u16) -> i32 {
        if csr == CSR_READ_BYTE {
            self.input.take().map_or(-1, i32::from)
        } else {
            -1
        }
    }

    fn print(&mut self, s: String) {
        let _ = self.sink.write_all(s.as_bytes());
        let _ = self.sink.flush();
    }

    fn print_guest_string(&mut self, guest_ptr: u32, ram: &[u8], ram_base: u32) {
        let Some(start) = guest_ptr.checked_sub(ram_base) else {
            return;
        };
        let start = start as usize;
        if start >= ram.len() {
            return;
        }
        let end = (start + MAX_STRING_LEN).min(ram.len());
        let slice = &ram[start..end];
        let nul = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
        self.print(String::from_utf8_lossy(&slice[..nul]).into_owned());
    }
}
