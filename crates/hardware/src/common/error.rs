//! Architectural trap types and the setup-error tier.

use thiserror::Error;

/// A RISC-V exception or interrupt, carrying whatever `mtval` it raises with.
///
/// Every variant maps to a fixed `mcause` value through [`Trap::cause`]. Only the
/// causes this machine actually implements are represented; there is no variant
/// for, e.g., software interrupts or page faults this implementation never raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Trap {
    /// `pc` was not 4-byte aligned.
    #[error("instruction address misaligned at {0:#x}")]
    InstructionAddressMisaligned(u32),
    /// Fetch targeted an address outside RAM and unclaimed by the bridge.
    #[error("instruction access fault at {0:#x}")]
    InstructionAccessFault(u32),
    /// The decoder did not recognize the opcode.
    #[error("illegal instruction {0:#010x}")]
    IllegalInstruction(u32),
    /// `EBREAK`.
    #[error("breakpoint")]
    Breakpoint,
    /// A load address was not aligned to its access width.
    #[error("load address misaligned at {0:#x}")]
    LoadAddressMisaligned(u32),
    /// Load targeted an address outside RAM and unclaimed by the bridge.
    #[error("load access fault at {0:#x}")]
    LoadAccessFault(u32),
    /// A store/AMO address was not aligned to its access width.
    #[error("store/amo address misaligned at {0:#x}")]
    StoreAmoAddressMisaligned(u32),
    /// Store/AMO targeted an address outside RAM and unclaimed by the bridge.
    #[error("store/amo access fault at {0:#x}")]
    StoreAmoAccessFault(u32),
    /// `ECALL` from user mode.
    #[error("environment call from u-mode")]
    EnvironmentCallFromUMode,
    /// `ECALL` from supervisor mode.
    #[error("environment call from s-mode")]
    EnvironmentCallFromSMode,
    /// `ECALL` from machine mode.
    #[error("environment call from m-mode")]
    EnvironmentCallFromMMode,
    /// SV32 walk rejected an instruction fetch.
    #[error("instruction page fault at {0:#x}")]
    InstructionPageFault(u32),
    /// SV32 walk rejected a load.
    #[error("load page fault at {0:#x}")]
    LoadPageFault(u32),
    /// SV32 walk rejected a store/AMO.
    #[error("store/amo page fault at {0:#x}")]
    StoreAmoPageFault(u32),
    /// The machine timer interrupt (the only interrupt source this machine implements).
    #[error("machine timer interrupt")]
    MachineTimerInterrupt,
}

impl Trap {
    /// The standard RISC-V `mcause` encoding: exceptions are small positive
    /// integers, interrupts have the top bit of the register width set.
    #[must_use]
    pub const fn cause(self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(_) => 0,
            Self::InstructionAccessFault(_) => 1,
            Self::IllegalInstruction(_) => 2,
            Self::Breakpoint => 3,
            Self::LoadAddressMisaligned(_) => 4,
            Self::LoadAccessFault(_) => 5,
            Self::StoreAmoAddressMisaligned(_) => 6,
            Self::StoreAmoAccessFault(_) => 7,
            Self::EnvironmentCallFromUMode => 8,
            Self::EnvironmentCallFromSMode => 9,
            Self::EnvironmentCallFromMMode => 11,
            Self::InstructionPageFault(_) => 12,
            Self::LoadPageFault(_) => 13,
            Self::StoreAmoPageFault(_) => 15,
            Self::MachineTimerInterrupt => 0x8000_0007,
        }
    }

    /// The value this trap writes into `mtval`; zero when not applicable.
    #[must_use]
    pub const fn tval(self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(a)
            | Self::InstructionAccessFault(a)
            | Self::IllegalInstruction(a)
            | Self::LoadAddressMisaligned(a)
            | Self::LoadAccessFault(a)
            | Self::StoreAmoAddressMisaligned(a)
            | Self::StoreAmoAccessFault(a)
            | Self::InstructionPageFault(a)
            | Self::LoadPageFault(a)
            | Self::StoreAmoPageFault(a) => a,
            Self::Breakpoint
            | Self::EnvironmentCallFromUMode
            | Self::EnvironmentCallFromSMode
            | Self::EnvironmentCallFromMMode
            | Self::MachineTimerInterrupt => 0,
        }
    }

    /// Whether this trap is an interrupt (vs. a synchronous exception).
    #[must_use]
    pub const fn is_interrupt(self) -> bool {
        matches!(self, Self::MachineTimerInterrupt)
    }
}

/// A failure that prevents the Step Loop from ever being entered.
///
/// Unlike [`Trap`], these never involve hart execution; `reset` validates its
/// inputs and returns one of these before any instruction has run.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The kernel image does not fit in the configured RAM.
    #[error("kernel image ({kernel_len} bytes) does not fit in {ram_size}-byte RAM")]
    KernelTooLarge {
        /// Size of the supplied kernel image, in bytes.
        kernel_len: usize,
        /// Configured RAM size, in bytes.
        ram_size: usize,
    },
    /// The device tree blob does not fit in the configured RAM alongside the kernel.
    #[error("device tree blob ({dtb_len} bytes) does not fit in {ram_size}-byte RAM")]
    DtbTooLarge {
        /// Size of the supplied DTB, in bytes.
        dtb_len: usize,
        /// Configured RAM size, in bytes.
        ram_size: usize,
    },
    /// `reset` was called with an empty kernel image.
    #[error("no kernel image supplied")]
    MissingKernel,
}
