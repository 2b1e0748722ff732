//! RV32IMA decode and execute.
//!
//! `step_one` is the Decoder/Executor's only public entry point: fetch one
//! instruction, execute it, and either commit its side effects or return the
//! trap it raised without committing anything (RISC-V exceptions are
//! all-or-nothing with respect to architectural state).

use crate::common::{Trap, Width, WFI_INSTRUCTION};
use crate::core::arch::PrivilegeMode;
use crate::core::decode::Decoded;
use crate::core::trap;
use crate::sim::Emulator;
use crate::soc::Bridge;

/// Fetches, decodes, and executes the instruction at `emu.hart.pc`.
///
/// On success, `emu.hart.pc` has already advanced (or branched/jumped). On
/// `Err`, no architectural state has changed except what was needed to
/// identify the fault — the caller is expected to deliver the trap via
/// [`crate::core::trap::deliver`] (or treat it as fatal under
/// `fail_on_all_faults`), using the unmodified `pc` as the faulting address.
pub fn step_one<B: Bridge>(emu: &mut Emulator<B>) -> Result<(), Trap> {
    let pc = emu.hart.pc;
    let word = emu.fetch(pc)?;
    let d = Decoded::new(word);
    let next_pc = pc.wrapping_add(4);

    match d.opcode {
        0x37 => {
            emu.hart.gpr.write(d.rd, d.u_imm() as u32);
            emu.hart.pc = next_pc;
        }
        0x17 => {
            emu.hart.gpr.write(d.rd, pc.wrapping_add(d.u_imm() as u32));
            emu.hart.pc = next_pc;
        }
        0x6f => {
            let target = pc.wrapping_add(d.j_imm() as u32);
            if target % 4 != 0 {
                return Err(Trap::InstructionAddressMisaligned(target));
            }
            emu.hart.gpr.write(d.rd, next_pc);
            emu.hart.pc = target;
        }
        0x67 => {
            let base = emu.hart.gpr.read(d.rs1);
            let target = base.wrapping_add(d.i_imm() as u32) & !1;
            if target % 4 != 0 {
                return Err(Trap::InstructionAddressMisaligned(target));
            }
            emu.hart.gpr.write(d.rd, next_pc);
            emu.hart.pc = target;
        }
        0x63 => execute_branch(emu, d, pc, next_pc, word)?,
        0x03 => execute_load(emu, d, next_pc, word)?,
        0x23 => execute_store(emu, d, next_pc, word)?,
        0x13 => execute_alu_imm(emu, d, next_pc, word)?,
        0x33 => {
            if d.funct7 == 0x01 {
                execute_muldiv(emu, d);
            } else {
                execute_alu_reg(emu, d, word)?;
            }
            emu.hart.pc = next_pc;
        }
        0x0f => {
            // FENCE family: a no-op in a single-hart, in-order interpreter.
            emu.hart.pc = next_pc;
        }
        0x2f => {
            execute_amo(emu, d, word)?;
            emu.hart.pc = next_pc;
        }
        0x73 => execute_system(emu, d, next_pc)?,
        _ => return Err(Trap::IllegalInstruction(word)),
    }
    Ok(())
}

fn execute_branch<B: Bridge>(
    emu: &mut Emulator<B>,
    d: Decoded,
    pc: u32,
    next_pc: u32,
    word: u32,
) -> Result<(), Trap> {
    let rs1 = emu.hart.gpr.read(d.rs1);
    let rs2 = emu.hart.gpr.read(d.rs2);
    let taken = match d.funct3 {
        0b000 => rs1 == rs2,
        0b001 => rs1 != rs2,
        0b100 => (rs1 as i32) < (rs2 as i32),
        0b101 => (rs1 as i32) >= (rs2 as i32),
        0b110 => rs1 < rs2,
        0b111 => rs1 >= rs2,
        _ => return Err(Trap::IllegalInstruction(word)),
    };
    if taken {
        let target = pc.wrapping_add(d.b_imm() as u32);
        if target % 4 != 0 {
            return Err(Trap::InstructionAddressMisaligned(target));
        }
        emu.hart.pc = target;
    } else {
        emu.hart.pc = next_pc;
    }
    Ok(())
}

fn execute_load<B: Bridge>(
    emu: &mut Emulator<B>,
    d: Decoded,
    next_pc: u32,
    word: u32,
) -> Result<(), Trap> {
    let base = emu.hart.gpr.read(d.rs1);
    let addr = base.wrapping_add(d.i_imm() as u32);
    let (width, signed) = match d.funct3 {
        0b000 => (Width::Byte, true),
        0b001 => (Width::Half, true),
        0b010 => (Width::Word, false),
        0b100 => (Width::Byte, false),
        0b101 => (Width::Half, false),
        _ => return Err(Trap::IllegalInstruction(word)),
    };
    let val = emu.load(addr, width, signed)?;
    emu.hart.gpr.write(d.rd, val);
    emu.hart.pc = next_pc;
    Ok(())
}

fn execute_store<B: Bridge>(
    emu: &mut Emulator<B>,
    d: Decoded,
    next_pc: u32,
    word: u32,
) -> Result<(), Trap> {
    let base = emu.hart.gpr.read(d.rs1);
    let addr = base.wrapping_add(d.s_imm() as u32);
    let width = match d.funct3 {
        0b000 => Width::Byte,
        0b001 => Width::Half,
        0b010 => Width::Word,
        _ => return Err(Trap::IllegalInstruction(word)),
    };
    let val = emu.hart.gpr.read(d.rs2);
    emu.store(addr, width, val)?;
    emu.hart.pc = next_pc;
    Ok(())
}

fn execute_alu_imm<B: Bridge>(
    emu: &mut Emulator<B>,
    d: Decoded,
    next_pc: u32,
    word: u32,
) -> Result<(), Trap> {
    let rs1 = emu.hart.gpr.read(d.rs1);
    let imm = d.i_imm() as u32;
    let result = match d.funct3 {
        0b000 => rs1.wrapping_add(imm),
        0b010 => u32::from((rs1 as i32) < (imm as i32)),
        0b011 => u32::from(rs1 < imm),
        0b100 => rs1 ^ imm,
        0b110 => rs1 | imm,
        0b111 => rs1 & imm,
        0b001 => rs1 << (imm & 0x1f),
        0b101 => {
            let shamt = imm & 0x1f;
            if d.funct7 & 0x20 != 0 {
                ((rs1 as i32) >> shamt) as u32
            } else {
                rs1 >> shamt
            }
        }
        _ => return Err(Trap::IllegalInstruction(word)),
    };
    emu.hart.gpr.write(d.rd, result);
    emu.hart.pc = next_pc;
    Ok(())
}

fn execute_alu_reg<B: Bridge>(emu: &mut Emulator<B>, d: Decoded, word: u32) -> Result<(), Trap> {
    let rs1 = emu.hart.gpr.read(d.rs1);
    let rs2 = emu.hart.gpr.read(d.rs2);
    let result = match (d.funct3, d.funct7) {
        (0b000, 0x00) => rs1.wrapping_add(rs2),
        (0b000, 0x20) => rs1.wrapping_sub(rs2),
        (0b001, 0x00) => rs1 << (rs2 & 0x1f),
        (0b010, 0x00) => u32::from((rs1 as i32) < (rs2 as i32)),
        (0b011, 0x00) => u32::from(rs1 < rs2),
        (0b100, 0x00) => rs1 ^ rs2,
        (0b101, 0x00) => rs1 >> (rs2 & 0x1f),
        (0b101, 0x20) => ((rs1 as i32) >> (rs2 & 0x1f)) as u32,
        (0b110, 0x00) => rs1 | rs2,
        (0b111, 0x00) => rs1 & rs2,
        _ => return Err(Trap::IllegalInstruction(word)),
    };
    emu.hart.gpr.write(d.rd, result);
    Ok(())
}

/// The M extension. Division follows the RISC-V special cases exactly:
/// division by zero never traps, and signed overflow (`INT_MIN / -1`) wraps
/// rather than panicking.
fn execute_muldiv<B: Bridge>(emu: &mut Emulator<B>, d: Decoded) {
    let rs1 = emu.hart.gpr.read(d.rs1);
    let rs2 = emu.hart.gpr.read(d.rs2);
    let result = match d.funct3 {
        0b000 => rs1.wrapping_mul(rs2),
        0b001 => (((rs1 as i32 as i64) * (rs2 as i32 as i64)) >> 32) as u32,
        0b010 => (((rs1 as i32 as i64) * (i64::from(rs2))) >> 32) as u32,
        0b011 => ((u64::from(rs1) * u64::from(rs2)) >> 32) as u32,
        0b100 => {
            let (a, b) = (rs1 as i32, rs2 as i32);
            if b == 0 {
                u32::MAX
            } else if a == i32::MIN && b == -1 {
                a as u32
            } else {
                a.wrapping_div(b) as u32
            }
        }
        0b101 => {
            if rs2 == 0 {
                u32::MAX
            } else {
                rs1 / rs2
            }
        }
        0b110 => {
            let (a, b) = (rs1 as i32, rs2 as i32);
            if b == 0 {
                a as u32
            } else if a == i32::MIN && b == -1 {
                0
            } else {
                a.wrapping_rem(b) as u32
            }
        }
        0b111 => {
            if rs2 == 0 {
                rs1
            } else {
                rs1 % rs2
            }
        }
        _ => unreachable!("funct3 is a 3-bit field"),
    };
    emu.hart.gpr.write(d.rd, result);
}

/// The A extension: `LR.W`/`SC.W` and the nine read-modify-write AMOs.
fn execute_amo<B: Bridge>(emu: &mut Emulator<B>, d: Decoded, word: u32) -> Result<(), Trap> {
    if d.funct3 != 0b010 {
        return Err(Trap::IllegalInstruction(word));
    }
    let addr = emu.hart.gpr.read(d.rs1);
    if addr % 4 != 0 {
        return Err(Trap::StoreAmoAddressMisaligned(addr));
    }

    match d.funct5() {
        0b00010 => {
            let val = emu.load(addr, Width::Word, true)?;
            emu.hart.reservation = Some(addr);
            emu.hart.gpr.write(d.rd, val);
        }
        0b00011 => {
            let rs2 = emu.hart.gpr.read(d.rs2);
            let success = emu.hart.reservation == Some(addr);
            if success {
                emu.store(addr, Width::Word, rs2)?;
            }
            // Unconditional: SC.W always clears the reservation, win or lose.
            emu.hart.clear_reservation();
            emu.hart.gpr.write(d.rd, u32::from(!success));
        }
        funct5 => {
            let old = emu.load(addr, Width::Word, false)?;
            let rs2 = emu.hart.gpr.read(d.rs2);
            let new = match funct5 {
                0b00001 => rs2,
                0b00000 => old.wrapping_add(rs2),
                0b00100 => old ^ rs2,
                0b01100 => old & rs2,
                0b01000 => old | rs2,
                0b10000 => {
                    if (old as i32) < (rs2 as i32) {
                        old
                    } else {
                        rs2
                    }
                }
                0b10100 => {
                    if (old as i32) > (rs2 as i32) {
                        old
                    } else {
                        rs2
                    }
                }
                0b11000 => old.min(rs2),
                0b11100 => old.max(rs2),
                _ => return Err(Trap::IllegalInstruction(word)),
            };
            emu.store(addr, Width::Word, new)?;
            emu.hart.gpr.write(d.rd, old);
        }
    }
    Ok(())
}

/// `ECALL`/`EBREAK`/`MRET`/`WFI` and the six CSR read-modify-write forms.
fn execute_system<B: Bridge>(emu: &mut Emulator<B>, d: Decoded, next_pc: u32) -> Result<(), Trap> {
    if d.funct3 == 0 {
        return match d.raw {
            0x0000_0073 => Err(match emu.hart.privilege {
                PrivilegeMode::User => Trap::EnvironmentCallFromUMode,
                PrivilegeMode::Supervisor => Trap::EnvironmentCallFromSMode,
                PrivilegeMode::Machine => Trap::EnvironmentCallFromMMode,
            }),
            0x0010_0073 => Err(Trap::Breakpoint),
            0x3020_0073 => {
                trap::mret(&mut emu.hart);
                Ok(())
            }
            WFI_INSTRUCTION => {
                emu.hart.wfi = true;
                emu.hart.pc = next_pc;
                Ok(())
            }
            _ => Err(Trap::IllegalInstruction(d.raw)),
        };
    }

    let csr = d.csr();
    let old = emu.csr_read(csr);
    match d.funct3 {
        0b001 => {
            let v = emu.hart.gpr.read(d.rs1);
            emu.csr_write(csr, v);
        }
        0b010 => {
            if d.rs1 != 0 {
                let v = emu.hart.gpr.read(d.rs1);
                emu.csr_write(csr, old | v);
            }
        }
        0b011 => {
            if d.rs1 != 0 {
                let v = emu.hart.gpr.read(d.rs1);
                emu.csr_write(csr, old & !v);
            }
        }
        0b101 => emu.csr_write(csr, d.csr_zimm()),
        0b110 => {
            let z = d.csr_zimm();
            if z != 0 {
                emu.csr_write(csr, old | z);
            }
        }
        0b111 => {
            let z = d.csr_zimm();
            if z != 0 {
                emu.csr_write(csr, old & !z);
            }
        }
        _ => return Err(Trap::IllegalInstruction(d.raw)),
    }
    emu.hart.gpr.write(d.rd, old);
    emu.hart.pc = next_pc;
    Ok(())
}
