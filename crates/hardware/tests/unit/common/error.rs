use rv32ima_core::common::{SetupError, Trap};

#[test]
fn test_ecall_from_m_mode_cause_is_eleven() {
    assert_eq!(Trap::EnvironmentCallFromMMode.cause(), 11);
}

#[test]
fn test_misaligned_load_tval_is_the_offending_address() {
    let trap = Trap::LoadAddressMisaligned(0x1234);
    assert_eq!(trap.tval(), 0x1234);
    assert_eq!(trap.cause(), 4);
}

#[test]
fn test_machine_timer_interrupt_cause_has_interrupt_bit_set() {
    let trap = Trap::MachineTimerInterrupt;
    assert_eq!(trap.cause(), 0x8000_0007);
    assert!(trap.is_interrupt());
}

#[test]
fn test_illegal_instruction_is_not_an_interrupt() {
    assert!(!Trap::IllegalInstruction(0).is_interrupt());
}

#[test]
fn test_kernel_too_large_reports_both_sizes() {
    let err = SetupError::KernelTooLarge {
        kernel_len: 100,
        ram_size: 64,
    };
    let message = err.to_string();
    assert!(message.contains("100"));
    assert!(message.contains("64"));
}
