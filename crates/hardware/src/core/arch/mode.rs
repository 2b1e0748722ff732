//! Privilege levels.

use std::fmt;

/// The hart's current privilege level.
///
/// Encoded with the RISC-V numeric values (`User = 0`, `Supervisor = 1`,
/// `Machine = 3`) so round-tripping through `mstatus.MPP` is a plain cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeMode {
    /// U-mode.
    User = 0,
    /// S-mode.
    Supervisor = 1,
    /// M-mode.
    Machine = 3,
}

impl PrivilegeMode {
    /// Decodes a 2-bit privilege field, defaulting to machine mode for the
    /// reserved encoding `2`, which this machine never produces itself but
    /// may see written back from a CSR field.
    #[must_use]
    pub const fn from_u8(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::User,
            1 => Self::Supervisor,
            _ => Self::Machine,
        }
    }

    /// The raw 2-bit encoding.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "U",
            Self::Supervisor => "S",
            Self::Machine => "M",
        })
    }
}
