//! Trap delivery.

use crate::common::Trap;
use crate::core::arch::PrivilegeMode;
use crate::core::hart::Hart;

/// Delivers a trap into machine mode following the six-step sequence: latch
/// `mcause`/`mtval`/`mepc`, save privilege and `MIE` into `mstatus`, raise
/// privilege, and vector to `mtvec`.
///
/// `pc_at_trap` is the address to latch into `mepc`: the faulting instruction
/// for a synchronous exception, or the next instruction to execute for an
/// interrupt (the Step Loop passes its current `pc`, since interrupts are only
/// taken at an instruction boundary — see the Step Loop's ordering rule).
pub fn deliver(hart: &mut Hart, trap: Trap, pc_at_trap: u32) {
    let cause = trap.cause();
    hart.csrs.mcause = cause;
    hart.csrs.mtval = trap.tval();
    hart.csrs.mepc = pc_at_trap;

    hart.csrs.set_mpp(hart.privilege.as_u8());
    hart.csrs.set_mpie(hart.csrs.mie_global());
    hart.csrs.set_mie_global(false);

    hart.privilege = PrivilegeMode::Machine;
    hart.pc = hart.csrs.mtvec & !0b11;

    // A trap is an intervening control transfer; a reservation must not
    // survive it even though this single-hart model has no other agent to
    // race against.
    hart.clear_reservation();
}

/// `MRET`: returns from a machine-mode trap handler.
pub fn mret(hart: &mut Hart) {
    hart.pc = hart.csrs.mepc;
    hart.privilege = PrivilegeMode::from_u8(hart.csrs.mpp());
    hart.csrs.set_mie_global(hart.csrs.mpie());
    hart.csrs.set_mpie(true);
    hart.csrs.set_mpp(PrivilegeMode::User.as_u8());
}

/// Whether the Trap Engine should be invoked for a pending interrupt: the
/// corresponding `mie`/`mip` bit is set and interrupts are globally enabled.
/// M-mode requires `mstatus.MIE`; a hart running in a less-privileged mode
/// always takes an enabled pending interrupt. This machine never drops below
/// machine mode on its own (no `SRET`/delegation), but the check is written
/// generally so it stays correct if supervisor-mode execution is ever driven
/// externally.
#[must_use]
pub fn interrupt_pending(hart: &Hart) -> bool {
    let globally_enabled = match hart.privilege {
        PrivilegeMode::Machine => hart.csrs.mie_global(),
        PrivilegeMode::Supervisor | PrivilegeMode::User => true,
    };
    globally_enabled && hart.csrs.timer_interrupt_enabled_and_pending()
}
