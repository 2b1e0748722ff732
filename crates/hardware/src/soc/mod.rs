//! The MMIO/syscon/debug-CSR bridge: the behavior interface of Design Note 9.

mod bridge;
pub mod devices;
mod input;
mod traits;

pub use bridge::StdBridge;
pub use input::InputBuffer;
pub use traits::{Bridge, MmioStore, SystemRequest};
