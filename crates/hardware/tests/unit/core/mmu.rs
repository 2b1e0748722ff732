//! Exercises SV32 translation through [`rv32ima_core::sim::Emulator::translate`],
//! since the page walker itself is a crate-private implementation detail.

use rv32ima_core::common::AccessType;

use crate::common::harness::{TestContext, RAM_BASE};

const PTE_V: u32 = 1;
const PTE_R: u32 = 1 << 1;
const PTE_W: u32 = 1 << 2;
const PTE_X: u32 = 1 << 3;

fn enable_sv32(ctx: &mut TestContext, root_table_addr: u32) {
    let ppn = (root_table_addr - RAM_BASE) / 4096 + RAM_BASE / 4096;
    ctx.emulator.hart.csrs.satp = (1 << 31) | ppn;
}

#[test]
fn test_two_level_walk_resolves_a_4kib_page() {
    let mut ctx = TestContext::new();
    let root = RAM_BASE + 0x1000;
    let leaf_table = RAM_BASE + 0x2000;
    let data_page = RAM_BASE + 0x4000;

    let va = 0x1000_0000u32;
    let vpn1 = (va >> 22) & 0x3ff;
    let vpn0 = (va >> 12) & 0x3ff;

    let root_pte = (((leaf_table / 4096) << 10) | PTE_V) as u32;
    let _ = ctx.emulator.memory.write_u32(root + vpn1 * 4, root_pte);

    let leaf_pte = (((data_page / 4096) << 10) | PTE_V | PTE_R | PTE_W | PTE_X) as u32;
    let _ = ctx.emulator.memory.write_u32(leaf_table + vpn0 * 4, leaf_pte);

    enable_sv32(&mut ctx, root);

    let pa = ctx.emulator.translate(va, AccessType::Read).unwrap();
    assert_eq!(pa, data_page);
}

#[test]
fn test_superpage_uses_va_low_bits_for_the_page_offset() {
    let mut ctx = TestContext::new();
    let root = RAM_BASE + 0x1000;
    let superpage_base = RAM_BASE + 0x40_0000; // 4 MiB aligned

    let va = 0x2040_3000u32;
    let vpn1 = (va >> 22) & 0x3ff;

    let root_pte = (((superpage_base / 4096) << 10) | PTE_V | PTE_R | PTE_W | PTE_X) as u32;
    let _ = ctx.emulator.memory.write_u32(root + vpn1 * 4, root_pte);

    enable_sv32(&mut ctx, root);

    let pa = ctx.emulator.translate(va, AccessType::Fetch).unwrap();
    assert_eq!(pa, superpage_base + (va & 0x003f_ffff));
}

#[test]
fn test_invalid_pte_raises_a_page_fault() {
    let mut ctx = TestContext::new();
    let root = RAM_BASE + 0x1000;
    enable_sv32(&mut ctx, root); // root table is all zero: V bit unset everywhere

    let err = ctx.emulator.translate(0x1000_0000, AccessType::Read);
    assert!(err.is_err());
    assert_eq!(err.unwrap_err().cause(), 13); // load page fault
}

#[test]
fn test_missing_write_permission_raises_a_page_fault() {
    let mut ctx = TestContext::new();
    let root = RAM_BASE + 0x1000;
    let leaf_table = RAM_BASE + 0x2000;
    let data_page = RAM_BASE + 0x4000;

    let va = 0x1000_0000u32;
    let vpn1 = (va >> 22) & 0x3ff;
    let vpn0 = (va >> 12) & 0x3ff;

    let root_pte = (((leaf_table / 4096) << 10) | PTE_V) as u32;
    let _ = ctx.emulator.memory.write_u32(root + vpn1 * 4, root_pte);

    // Read-only leaf: no PTE_W.
    let leaf_pte = (((data_page / 4096) << 10) | PTE_V | PTE_R) as u32;
    let _ = ctx.emulator.memory.write_u32(leaf_table + vpn0 * 4, leaf_pte);

    enable_sv32(&mut ctx, root);

    let err = ctx.emulator.translate(va, AccessType::Write);
    assert_eq!(err.unwrap_err().cause(), 15); // store/amo page fault
}

#[test]
fn test_identity_mapping_when_sv32_disabled() {
    let ctx = TestContext::new();
    assert_eq!(
        ctx.emulator.translate(0x1234_5678, AccessType::Read).unwrap(),
        0x1234_5678
    );
}
