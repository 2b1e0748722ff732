//! The syscon power/reset register.

use crate::soc::traits::SystemRequest;

/// Conventional syscon address.
pub const SYSCON_ADDR: u32 = 0x1100_bff8;

const POWEROFF_VALUE: u32 = 0x5555;
const RESTART_VALUE: u32 = 0x7777;

/// Decodes a syscon store into a [`SystemRequest`], if the value is recognized.
#[must_use]
pub fn decode_store(val: u32) -> Option<SystemRequest> {
    match val {
        POWEROFF_VALUE => Some(SystemRequest::PowerOff),
        RESTART_VALUE => Some(SystemRequest::Restart),
        _ => None,
    }
}
