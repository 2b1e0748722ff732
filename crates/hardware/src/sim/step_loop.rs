//! The bounded-batch execution driver.

use crate::common::Trap;
use crate::core::{interrupt_pending, step_one};
use crate::soc::{Bridge, SystemRequest};

use super::emulator::Emulator;

/// The outcome of one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The batch completed normally; call `run` again.
    Ok,
    /// The hart is in `WFI` with no enabled interrupt pending. The caller
    /// should invoke the host sleep primitive before calling `run` again.
    Idle,
    /// The guest requested power-off via syscon.
    Halt,
    /// The guest requested a restart via syscon; the caller should call
    /// `reset` again (Design Note: "Restart via goto").
    Restart,
    /// A trap was raised while `fail_on_all_faults` is set; the caller should
    /// stop and report hart state.
    Error,
}

impl<B: Bridge> Emulator<B> {
    /// Advances the machine by up to `step_batch` instructions, after folding
    /// in `elapsed_us` of simulated wall-clock time and servicing the timer.
    ///
    /// Interrupts are only ever checked at an instruction boundary — never
    /// mid-instruction — which is also why atomics never observe an
    /// intervening interrupt: the whole `LR.W`/`SC.W` pair runs inside a
    /// single `step_one` call.
    pub fn run(&mut self, step_batch: u32, elapsed_us: u64) -> RunStatus {
        self.hart.cycle = self.hart.cycle.wrapping_add(elapsed_us);
        if self.hart.timer_due() {
            self.hart.csrs.set_mtip(true);
        }

        // Waking from WFI only needs the interrupt itself to be pending
        // (mie ∧ mip), not `mstatus.MIE`: a hart can be parked with global
        // interrupts disabled and still must resume once the condition it's
        // waiting on fires. Whether that interrupt is then actually taken is
        // the separate, globally-gated check below.
        if self.hart.wfi {
            if self.hart.csrs.timer_interrupt_enabled_and_pending() {
                self.hart.wfi = false;
            } else {
                return RunStatus::Idle;
            }
        }

        if interrupt_pending(&self.hart) {
            self.deliver_trap(Trap::MachineTimerInterrupt);
        }

        self.stats.batches_run += 1;

        for _ in 0..step_batch {
            let pc_at_fetch = self.hart.pc;
            match step_one(self) {
                Ok(()) => {
                    self.stats.instructions_retired += 1;
                    if self.trace_instructions {
                        tracing::trace!(pc = pc_at_fetch, cycle = self.hart.cycle, "instruction retired");
                    }
                }
                Err(trap) => {
                    if self.fail_on_all_faults {
                        tracing::error!(state = %self.dump_state(), ?trap, "fatal trap");
                        return RunStatus::Error;
                    }
                    tracing::debug!(cause = trap.cause(), mepc = self.hart.pc, "trap delivered");
                    self.deliver_trap(trap);
                }
            }
            self.hart.cycle = self.hart.cycle.wrapping_add(1);

            if let Some(req) = self.take_pending_request() {
                return match req {
                    SystemRequest::PowerOff => RunStatus::Halt,
                    SystemRequest::Restart => RunStatus::Restart,
                };
            }
        }

        RunStatus::Ok
    }
}
