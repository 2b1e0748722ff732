//! Run configuration: general execution parameters and the system memory map.
//!
//! `Config` is plain data, deserialized with `serde_json` by the driver
//! binary; the core never reads a file itself.

use serde::{Deserialize, Serialize};

/// General execution parameters for the Step Loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Instructions executed per `run` call before control returns to the
    /// driver to service host I/O and re-measure elapsed time.
    pub step_batch_size: u32,
    /// Simulated microseconds per host millisecond of wall-clock time, used
    /// by the driver to convert a sleep interval into `elapsed_us`.
    pub time_divisor: u32,
    /// Convert any delivered trap into a fatal `RunStatus::Error` instead of
    /// delivering it to the guest. Intended for debugging a misbehaving
    /// kernel, not for normal operation.
    pub fail_on_all_faults: bool,
    /// Emit a `tracing::trace!` event for every retired instruction. Very
    /// expensive; off by default.
    pub trace_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            step_batch_size: 1024,
            time_divisor: 1,
            fail_on_all_faults: false,
            trace_instructions: false,
        }
    }
}

/// The system memory map: where RAM starts and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Guest physical address of the first byte of RAM, and the hart's
    /// initial `pc` on reset.
    pub ram_base: u32,
    /// Size of the RAM window in bytes.
    pub ram_size: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: 0x8000_0000,
            ram_size: 64 * 1024 * 1024,
        }
    }
}

/// The full run configuration, round-tripping through `serde_json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Step Loop and debugging parameters.
    pub general: GeneralConfig,
    /// Memory map parameters.
    pub system: SystemConfig,
}
