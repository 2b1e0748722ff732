use crate::common::encode::{csrrs, csrrw, csrrwi, EBREAK, ECALL, MRET, WFI};
use crate::common::harness::{TestContext, RAM_BASE};
use rv32ima_core::core::arch::PrivilegeMode;

const MSCRATCH: u16 = 0x340;

#[test]
fn test_ecall_from_machine_mode_raises_the_m_mode_variant() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[ECALL]);
    let err = ctx.step().unwrap_err();
    assert_eq!(err.cause(), 11);
}

#[test]
fn test_ebreak_raises_breakpoint() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[EBREAK]);
    let err = ctx.step().unwrap_err();
    assert_eq!(err.cause(), 3);
}

#[test]
fn test_wfi_sets_the_wfi_flag_and_advances_pc() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[WFI]);
    ctx.step().unwrap();
    assert!(ctx.emulator.hart.wfi);
    assert_eq!(ctx.emulator.hart.pc, RAM_BASE + 4);
}

#[test]
fn test_mret_restores_privilege_and_pc_from_mepc() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[MRET]);
    ctx.emulator.hart.csrs.mepc = 0x8000_1000;
    ctx.emulator.hart.csrs.set_mpp(PrivilegeMode::Machine.as_u8());
    ctx.emulator.hart.privilege = PrivilegeMode::Machine;
    ctx.step().unwrap();
    assert_eq!(ctx.emulator.hart.pc, 0x8000_1000);
    assert_eq!(ctx.emulator.hart.privilege, PrivilegeMode::Machine);
}

#[test]
fn test_csrrw_writes_new_value_and_returns_old_in_rd() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csrrw(2, MSCRATCH, 1)]);
    ctx.emulator.hart.csrs.mscratch = 0xaaaa_aaaa;
    ctx.set_reg(1, 0x1234);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(2), 0xaaaa_aaaa);
    assert_eq!(ctx.emulator.hart.csrs.mscratch, 0x1234);
}

#[test]
fn test_csrrs_with_zero_source_register_does_not_write() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csrrs(2, MSCRATCH, 0)]);
    ctx.emulator.hart.csrs.mscratch = 0x55;
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(2), 0x55);
    assert_eq!(ctx.emulator.hart.csrs.mscratch, 0x55);
}

#[test]
fn test_csrrwi_always_writes_even_with_zero_immediate() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[csrrwi(2, MSCRATCH, 0)]);
    ctx.emulator.hart.csrs.mscratch = 0x55;
    ctx.step().unwrap();
    assert_eq!(ctx.emulator.hart.csrs.mscratch, 0);
}
