use crate::common::encode::{add, addi, and, slt, sub};
use crate::common::harness::{TestContext, RAM_BASE};

#[test]
fn test_addi_adds_sign_extended_immediate() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[addi(1, 0, -1)]);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(1), 0xffff_ffff);
}

#[test]
fn test_add_wraps_on_overflow() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[add(3, 1, 2)]);
    ctx.set_reg(1, u32::MAX);
    ctx.set_reg(2, 1);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(3), 0);
}

#[test]
fn test_sub_computes_two_operand_difference() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[sub(3, 1, 2)]);
    ctx.set_reg(1, 10);
    ctx.set_reg(2, 3);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(3), 7);
}

#[test]
fn test_slt_is_signed_comparison() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[slt(3, 1, 2)]);
    ctx.set_reg(1, u32::MAX);
    ctx.set_reg(2, 1);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(3), 1, "-1 < 1 under signed comparison");
}

#[test]
fn test_and_masks_bits() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[and(3, 1, 2)]);
    ctx.set_reg(1, 0xff0f);
    ctx.set_reg(2, 0x0fff);
    ctx.step().unwrap();
    assert_eq!(ctx.get_reg(3), 0x0f0f);
}

#[test]
fn test_pc_advances_by_four_on_sequential_execution() {
    let mut ctx = TestContext::new().load_program(RAM_BASE, &[addi(1, 0, 1), addi(2, 0, 2)]);
    ctx.step().unwrap();
    assert_eq!(ctx.emulator.hart.pc, RAM_BASE + 4);
    ctx.step().unwrap();
    assert_eq!(ctx.emulator.hart.pc, RAM_BASE + 8);
}
