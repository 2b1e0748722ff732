//! Guest image loading: kernel/DTB placement and the DTB sentinel patch.

use crate::common::SetupError;
use crate::core::{Hart, Memory};
use crate::soc::Bridge;

use super::emulator::Emulator;

/// Bytes reserved at the top of the configured RAM size for bookkeeping
/// compatible with the reference's embedded machine-state structure, even
/// though this implementation keeps hart state outside the RAM buffer
/// entirely (Design Note: "Global mutable state").
const RESERVED_TOP_BYTES: u32 = 256;

/// Offset of the RAM-size sentinel cell within the DTB.
const DTB_SENTINEL_OFFSET: usize = 0x13c;
/// The sentinel value that must be present for the RAM-size patch to apply.
const DTB_SENTINEL_VALUE: u32 = 0x00c0_ff03;
/// Offset of the command-line slot within the DTB.
const DTB_CMDLINE_OFFSET: usize = 0xc0;
/// Maximum command-line length the DTB slot accepts.
const DTB_CMDLINE_MAX: usize = 54;

/// Initializes RAM and hart state for a fresh boot: copies `kernel` to the
/// base of RAM and `dtb` near the top (below a small reserved region),
/// applies the sentinel and command-line patches to the DTB copy, and
/// returns a ready-to-run [`Emulator`].
///
/// # Errors
///
/// Returns [`SetupError`] if `kernel` is empty or either image does not fit
/// in `ram_size`. No hart state is touched before these checks pass.
pub fn reset<B: Bridge>(
    image_base: u32,
    ram_size: u32,
    kernel: &[u8],
    dtb: &[u8],
    cmdline: &str,
    bridge: B,
    fail_on_all_faults: bool,
    trace_instructions: bool,
) -> Result<Emulator<B>, SetupError> {
    if kernel.is_empty() {
        return Err(SetupError::MissingKernel);
    }
    if kernel.len() as u32 > ram_size {
        return Err(SetupError::KernelTooLarge {
            kernel_len: kernel.len(),
            ram_size: ram_size as usize,
        });
    }

    let usable = ram_size.saturating_sub(RESERVED_TOP_BYTES);
    if dtb.len() as u32 > usable {
        return Err(SetupError::DtbTooLarge {
            dtb_len: dtb.len(),
            ram_size: ram_size as usize,
        });
    }

    let dtb_offset = usable.saturating_sub(dtb.len() as u32);
    let mut patched_dtb = dtb.to_vec();
    patch_dtb(&mut patched_dtb, usable, cmdline);

    let mut memory = Memory::new(image_base, ram_size);
    memory.load_bytes(image_base, kernel);
    memory.load_bytes(image_base + dtb_offset, &patched_dtb);

    let dtb_guest_addr = image_base + dtb_offset;
    let hart = Hart::reset(image_base, dtb_guest_addr);

    tracing::info!(
        ram_size,
        entry = image_base,
        dtb_addr = dtb_guest_addr,
        kernel_len = kernel.len(),
        "hart reset"
    );

    Ok(Emulator::new(hart, memory, bridge, fail_on_all_faults, trace_instructions))
}

/// Applies the two DTB patches described in the reset sentinel contract.
///
/// The RAM-size cell is only overwritten when the sentinel is present —
/// otherwise this is a documented no-op, not a best-effort guess. The
/// command-line copy is independent of whether the sentinel matched.
fn patch_dtb(dtb: &mut [u8], guest_visible_ram_size: u32, cmdline: &str) {
    if let Some(slot) = dtb.get(DTB_SENTINEL_OFFSET..DTB_SENTINEL_OFFSET + 4) {
        let current = u32::from_be_bytes([slot[0], slot[1], slot[2], slot[3]]);
        if current == DTB_SENTINEL_VALUE {
            let patched = guest_visible_ram_size.to_be_bytes();
            dtb[DTB_SENTINEL_OFFSET..DTB_SENTINEL_OFFSET + 4].copy_from_slice(&patched);
        }
    }

    if !cmdline.is_empty() {
        let n = cmdline.len().min(DTB_CMDLINE_MAX);
        if let Some(slot) = dtb.get_mut(DTB_CMDLINE_OFFSET..DTB_CMDLINE_OFFSET + n) {
            slot.copy_from_slice(&cmdline.as_bytes()[..n]);
        }
    }
}
