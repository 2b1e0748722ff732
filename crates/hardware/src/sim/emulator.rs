//! The top-level emulator handle.
//!
//! Per the redesign of the reference's global mutable state, every piece of
//! mutable machine state (hart, RAM, the bridge) is owned here and passed by
//! `&mut self` into every operation; nothing is a process-wide static.

use crate::common::{AccessType, Trap, Width};
use crate::core::arch::{
    CYCLE, CYCLEH, MCAUSE, MCYCLE, MCYCLEH, MEPC, MIE, MIP, MISA, MSCRATCH, MSTATUS, MTVAL, MTVEC,
    SATP, TIME, TIMEH, TIMERMATCH_HI, TIMERMATCH_LO, TIMER_HI, TIMER_LO,
};
use crate::core::mmu;
use crate::core::{deliver, Hart, Memory};
use crate::soc::{Bridge, MmioStore, SystemRequest};

/// Owns a hart, its RAM, and the bridge to the outside world.
///
/// `B` is generic so tests can plug in a `mockall` mock of [`Bridge`] while
/// the driver binary plugs in [`crate::soc::StdBridge`].
#[derive(Debug)]
pub struct Emulator<B: Bridge> {
    /// Architectural hart state.
    pub hart: Hart,
    /// Guest RAM.
    pub memory: Memory,
    /// The MMIO/CSR behavior interface.
    pub bridge: B,
    /// Tier-2 error handling: convert any delivered trap into a fatal
    /// `RunStatus::Error` instead of delivering it to the guest.
    pub fail_on_all_faults: bool,
    /// Emit a `tracing::trace!` event for every retired instruction.
    pub trace_instructions: bool,
    /// Retirement/trap counters, consulted when a fatal error is reported.
    pub stats: crate::stats::Stats,
    pending_request: Option<SystemRequest>,
}

impl<B: Bridge> Emulator<B> {
    /// Builds an emulator over already-initialized RAM and hart state.
    pub fn new(
        hart: Hart,
        memory: Memory,
        bridge: B,
        fail_on_all_faults: bool,
        trace_instructions: bool,
    ) -> Self {
        Self {
            hart,
            memory,
            bridge,
            fail_on_all_faults,
            trace_instructions,
            stats: crate::stats::Stats::new(),
            pending_request: None,
        }
    }

    /// A one-line hart-state dump, used when a fatal error is reported.
    #[must_use]
    pub fn dump_state(&self) -> String {
        format!(
            "pc={:#010x} priv={} cycle={} mcause={:#x} mepc={:#010x} mtval={:#010x} instructions_retired={}",
            self.hart.pc,
            self.hart.privilege,
            self.hart.cycle,
            self.hart.csrs.mcause,
            self.hart.csrs.mepc,
            self.hart.csrs.mtval,
            self.stats.instructions_retired,
        )
    }

    /// Translates a virtual address, honoring SV32 if `satp` selects it.
    pub fn translate(&self, va: u32, access: AccessType) -> Result<u32, Trap> {
        if self.hart.csrs.sv32_enabled() {
            mmu::translate(
                self.memory.as_slice(),
                self.memory.base(),
                self.hart.csrs.satp_ppn(),
                va,
                access,
                self.hart.privilege,
            )
        } else {
            Ok(va)
        }
    }

    /// Fetches the 32-bit instruction word at `va`.
    pub fn fetch(&mut self, va: u32) -> Result<u32, Trap> {
        if va % 4 != 0 {
            return Err(Trap::InstructionAddressMisaligned(va));
        }
        let pa = self.translate(va, AccessType::Fetch)?;
        self.memory
            .read_u32(pa)
            .ok_or(Trap::InstructionAccessFault(va))
    }

    /// Loads a value of the given `width` from `va`, applying `AccessType::Read`
    /// translation rules and sign-extending if `signed`.
    pub fn load(&mut self, va: u32, width: Width, signed: bool) -> Result<u32, Trap> {
        if va % width.bytes() != 0 {
            return Err(Trap::LoadAddressMisaligned(va));
        }
        let pa = self.translate(va, AccessType::Read)?;
        let raw = if self.memory.contains(pa) {
            match width {
                Width::Byte => self.memory.read_u8(pa).map(u32::from),
                Width::Half => self.memory.read_u16(pa).map(u32::from),
                Width::Word => self.memory.read_u32(pa),
            }
            .ok_or(Trap::LoadAccessFault(va))?
        } else {
            self.bridge.load_mmio(pa).ok_or(Trap::LoadAccessFault(va))?
        };
        Ok(extend(raw, width, signed))
    }

    /// Stores a value of the given `width` to `va`.
    pub fn store(&mut self, va: u32, width: Width, val: u32) -> Result<(), Trap> {
        if va % width.bytes() != 0 {
            return Err(Trap::StoreAmoAddressMisaligned(va));
        }
        let pa = self.translate(va, AccessType::Write)?;
        if self.memory.contains(pa) {
            let ok = match width {
                Width::Byte => self.memory.write_u8(pa, val as u8),
                Width::Half => self.memory.write_u16(pa, val as u16),
                Width::Word => self.memory.write_u32(pa, val),
            };
            if !ok {
                return Err(Trap::StoreAmoAccessFault(va));
            }
        } else {
            match self.bridge.store_mmio(pa, val) {
                MmioStore::Handled => {}
                MmioStore::Request(req) => self.pending_request = Some(req),
                MmioStore::Unclaimed => return Err(Trap::StoreAmoAccessFault(va)),
            }
        }
        self.clear_reservation_if_other_address(pa);
        Ok(())
    }

    /// Any store to an address other than the one held in reservation clears
    /// it (see the resolved Open Question on LR/SC granularity).
    fn clear_reservation_if_other_address(&mut self, pa: u32) {
        if self.hart.reservation.is_some_and(|r| r != pa) {
            self.hart.clear_reservation();
        }
    }

    /// Reads a CSR, handling the aliases this machine defines and delegating
    /// anything else to the bridge.
    pub fn csr_read(&mut self, csr: u16) -> u32 {
        match csr {
            MSTATUS => self.hart.csrs.mstatus,
            MISA => self.hart.misa(),
            MIE => self.hart.csrs.mie,
            MTVEC => self.hart.csrs.mtvec,
            MSCRATCH => self.hart.csrs.mscratch,
            MEPC => self.hart.csrs.mepc,
            MCAUSE => self.hart.csrs.mcause,
            MTVAL => self.hart.csrs.mtval,
            MIP => self.hart.csrs.mip,
            SATP => self.hart.csrs.satp,
            CYCLE | MCYCLE | TIME => self.hart.cycle_lo(),
            CYCLEH | MCYCLEH | TIMEH => self.hart.cycle_hi(),
            TIMERMATCH_LO => self.hart.timer_match_lo(),
            TIMERMATCH_HI => self.hart.timer_match_hi(),
            TIMER_LO => self.hart.cycle_lo(),
            TIMER_HI => self.hart.cycle_hi(),
            other => self.bridge.csr_read_other(other) as u32,
        }
    }

    /// Writes a CSR, handling the aliases this machine defines and delegating
    /// anything else to the bridge.
    pub fn csr_write(&mut self, csr: u16, val: u32) {
        match csr {
            MSTATUS => self.hart.csrs.mstatus = val,
            MIE => self.hart.csrs.mie = val,
            MTVEC => self.hart.csrs.mtvec = val,
            MSCRATCH => self.hart.csrs.mscratch = val,
            MEPC => self.hart.csrs.mepc = val,
            MCAUSE => self.hart.csrs.mcause = val,
            MTVAL => self.hart.csrs.mtval = val,
            MIP => self.hart.csrs.mip = val,
            SATP => self.hart.csrs.satp = val,
            MISA => {}
            CYCLE | MCYCLE | TIME => self.hart.set_cycle_lo(val),
            CYCLEH | MCYCLEH | TIMEH => self.hart.set_cycle_hi(val),
            TIMERMATCH_LO => self.hart.set_timer_match_lo(val),
            TIMERMATCH_HI => self.hart.set_timer_match_hi(val),
            TIMER_LO => self.hart.set_cycle_lo(val),
            TIMER_HI => self.hart.set_cycle_hi(val),
            other => {
                let base = self.memory.base();
                self.bridge
                    .csr_write_other(other, val, self.memory.as_slice(), base);
            }
        }
    }

    /// Delivers `trap`, clearing any pending fail-fast distinction: the Step
    /// Loop is the one that decides whether to deliver or to treat this as
    /// fatal (see [`Emulator::fail_on_all_faults`]).
    pub fn deliver_trap(&mut self, t: Trap) {
        let pc = self.hart.pc;
        deliver(&mut self.hart, t, pc);
        self.stats.traps_taken += 1;
    }

    /// Takes and clears any halt/restart request raised by the last MMIO store.
    pub fn take_pending_request(&mut self) -> Option<SystemRequest> {
        self.pending_request.take()
    }
}

fn extend(raw: u32, width: Width, signed: bool) -> u32 {
    match (width, signed) {
        (Width::Byte, false) => u32::from(raw as u8),
        (Width::Byte, true) => (raw as u8 as i8) as i32 as u32,
        (Width::Half, false) => u32::from(raw as u16),
        (Width::Half, true) => (raw as u16 as i16) as i32 as u32,
        (Width::Word, _) => raw,
    }
}
