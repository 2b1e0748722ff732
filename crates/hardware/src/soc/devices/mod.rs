//! Concrete MMIO/CSR devices used by [`crate::soc::bridge::StdBridge`].

mod debug;
mod syscon;
mod uart;

pub use debug::DebugPort;
pub use syscon::decode_store as decode_syscon_store;
pub use syscon::SYSCON_ADDR;
pub use uart::{Uart, UART_DATA, UART_LSR};
