//! Hart state, memory/translation, decode/execute, and trap delivery.

pub mod arch;
mod decode;
mod execute;
mod hart;
mod memory;
pub(crate) mod mmu;
mod trap;

pub use decode::Decoded;
pub use execute::step_one;
pub use hart::Hart;
pub use memory::Memory;
pub use trap::{deliver, interrupt_pending, mret};
