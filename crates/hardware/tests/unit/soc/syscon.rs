use rv32ima_core::soc::devices::decode_syscon_store;
use rv32ima_core::soc::SystemRequest;

#[test]
fn test_decode_store_recognizes_poweroff_and_restart_sentinels() {
    assert_eq!(decode_syscon_store(0x5555), Some(SystemRequest::PowerOff));
    assert_eq!(decode_syscon_store(0x7777), Some(SystemRequest::Restart));
}

#[test]
fn test_decode_store_ignores_any_other_value() {
    assert_eq!(decode_syscon_store(0), None);
    assert_eq!(decode_syscon_store(1), None);
}
