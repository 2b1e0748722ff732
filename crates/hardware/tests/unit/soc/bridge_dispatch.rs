//! Asserts the core calls [`rv32ima_core::soc::Bridge`] with the exact
//! physical addresses and values a mock expects, rather than just checking
//! end-to-end effects through a hand-written bridge.

use mockall::predicate::eq;

use rv32ima_core::common::Width;
use rv32ima_core::soc::MmioStore;

use crate::common::harness::{TestContext, RAM_BASE, RAM_SIZE};
use crate::common::mocks::MockBridge;

const OUTSIDE_RAM: u32 = RAM_BASE + RAM_SIZE + 0x1000;

#[test]
fn test_load_outside_ram_dispatches_exactly_once_to_load_mmio() {
    let mut mock = MockBridge::new();
    let _ = mock.expect_load_mmio().with(eq(OUTSIDE_RAM)).times(1).return_const(Some(0x42));
    let mut ctx = TestContext::with_bridge(mock);

    let val = ctx.emulator.load(OUTSIDE_RAM, Width::Word, false).unwrap();
    assert_eq!(val, 0x42);
}

#[test]
fn test_load_outside_ram_returns_access_fault_when_bridge_does_not_recognize_it() {
    let mut mock = MockBridge::new();
    let _ = mock.expect_load_mmio().return_const(None);
    let mut ctx = TestContext::with_bridge(mock);

    assert!(ctx.emulator.load(OUTSIDE_RAM, Width::Word, false).is_err());
}

#[test]
fn test_store_outside_ram_dispatches_exactly_once_to_store_mmio() {
    let mut mock = MockBridge::new();
    let _ = mock
        .expect_store_mmio()
        .with(eq(OUTSIDE_RAM), eq(0xabcd))
        .times(1)
        .return_const(MmioStore::Handled);
    let mut ctx = TestContext::with_bridge(mock);

    ctx.emulator.store(OUTSIDE_RAM, Width::Word, 0xabcd).unwrap();
}

#[test]
fn test_store_requesting_poweroff_is_surfaced_as_a_pending_request() {
    use rv32ima_core::soc::SystemRequest;

    let mut mock = MockBridge::new();
    let _ = mock.expect_store_mmio().return_const(MmioStore::Request(SystemRequest::PowerOff));
    let mut ctx = TestContext::with_bridge(mock);

    ctx.emulator.store(OUTSIDE_RAM, Width::Word, 0x5555).unwrap();
    assert_eq!(ctx.emulator.take_pending_request(), Some(SystemRequest::PowerOff));
}

#[test]
fn test_unrecognized_csr_read_delegates_to_csr_read_other() {
    let mut mock = MockBridge::new();
    let _ = mock.expect_csr_read_other().with(eq(0x140)).times(1).return_const(-1);
    let mut ctx = TestContext::with_bridge(mock);

    assert_eq!(ctx.emulator.csr_read(0x140), u32::MAX);
}

#[test]
fn test_unrecognized_csr_write_delegates_to_csr_write_other_with_ram_access() {
    let mut mock = MockBridge::new();
    let _ = mock
        .expect_csr_write_other()
        .withf(|&csr, &val, _ram, &ram_base| csr == 0x138 && val == RAM_BASE + 4 && ram_base == RAM_BASE)
        .times(1)
        .return_const(());
    let mut ctx = TestContext::with_bridge(mock);

    ctx.emulator.csr_write(0x138, RAM_BASE + 4);
}
