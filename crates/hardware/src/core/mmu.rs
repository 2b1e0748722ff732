//! SV32 two-level page walk.
//!
//! Exercised only when `satp`'s mode bit selects SV32; the default identity
//! path lives in [`crate::sim::emulator`]. Page tables are assumed to live in
//! guest RAM, since that is the only physical memory this machine exposes to
//! the walker.

use crate::common::{AccessType, Trap};
use crate::core::arch::PrivilegeMode;

const PAGE_SHIFT: u32 = 12;
const PAGE_SIZE: u32 = 1 << PAGE_SHIFT;
const VPN_BITS: u32 = 10;
const VPN_MASK: u32 = (1 << VPN_BITS) - 1;

const PTE_V: u32 = 1 << 0;
const PTE_R: u32 = 1 << 1;
const PTE_W: u32 = 1 << 2;
const PTE_X: u32 = 1 << 3;
const PTE_U: u32 = 1 << 4;

fn page_fault(access: AccessType, va: u32) -> Trap {
    match access {
        AccessType::Fetch => Trap::InstructionPageFault(va),
        AccessType::Read => Trap::LoadPageFault(va),
        AccessType::Write => Trap::StoreAmoPageFault(va),
    }
}

/// Reads a little-endian `u32` from `ram` at guest-physical address `pa`,
/// where `pa` is relative to the start of RAM (`pa - base` already applied by
/// the caller). Returns `None` if the read falls outside `ram`.
fn read_pte(ram: &[u8], offset: u32) -> Option<u32> {
    let offset = offset as usize;
    let bytes = ram.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Walks the two-level SV32 page table rooted at `satp_ppn` to translate `va`.
///
/// `ram` and `ram_base` describe the flat guest RAM window; a page-table entry
/// whose address (root or next level) falls outside that window is treated as
/// a page fault, since this machine has no other physical memory for tables
/// to live in.
pub fn translate(
    ram: &[u8],
    ram_base: u32,
    satp_ppn: u32,
    va: u32,
    access: AccessType,
    privilege: PrivilegeMode,
) -> Result<u32, Trap> {
    let vpn1 = (va >> 22) & VPN_MASK;
    let vpn0 = (va >> 12) & VPN_MASK;
    let offset = va & (PAGE_SIZE - 1);

    let mut table_base = satp_ppn << PAGE_SHIFT;

    for (level, vpn) in [(1u32, vpn1), (0, vpn0)] {
        let pte_addr = table_base.wrapping_add(vpn * 4);
        let Some(ram_offset) = pte_addr.checked_sub(ram_base) else {
            return Err(page_fault(access, va));
        };
        let Some(pte) = read_pte(ram, ram_offset) else {
            return Err(page_fault(access, va));
        };

        if pte & PTE_V == 0 || (pte & PTE_W != 0 && pte & PTE_R == 0) {
            return Err(page_fault(access, va));
        }

        let is_leaf = pte & (PTE_R | PTE_X) != 0;
        if !is_leaf {
            if level == 0 {
                return Err(page_fault(access, va));
            }
            table_base = (pte >> 10) << PAGE_SHIFT;
            continue;
        }

        check_permission(pte, access, privilege).map_err(|()| page_fault(access, va))?;

        let ppn = pte >> 10;
        if level == 1 && ppn & VPN_MASK != 0 {
            // Misaligned superpage: the low PPN bits must be zero.
            return Err(page_fault(access, va));
        }

        let pa = if level == 1 {
            // 4 MiB superpage: PPN[1] from the PTE, PPN[0] from the VA.
            ((ppn & !VPN_MASK) << PAGE_SHIFT) | (vpn0 << PAGE_SHIFT) | offset
        } else {
            (ppn << PAGE_SHIFT) | offset
        };
        return Ok(pa);
    }

    Err(page_fault(access, va))
}

fn check_permission(pte: u32, access: AccessType, privilege: PrivilegeMode) -> Result<(), ()> {
    let user_page = pte & PTE_U != 0;
    match privilege {
        PrivilegeMode::User if !user_page => return Err(()),
        PrivilegeMode::Supervisor if user_page => return Err(()),
        PrivilegeMode::User | PrivilegeMode::Supervisor | PrivilegeMode::Machine => {}
    }
    let required = match access {
        AccessType::Fetch => PTE_X,
        AccessType::Read => PTE_R,
        AccessType::Write => PTE_W,
    };
    if pte & required == 0 {
        return Err(());
    }
    Ok(())
}
