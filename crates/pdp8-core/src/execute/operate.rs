//! Operate-instruction micro-op sequencing.
//!
//! Micro-operations run in a fixed architectural order regardless of the
//! order their mnemonics were written in:
//!
//! - Group 1: CLA/CLL, then CMA/CML, then IAC, then RAR/RAL (or RTR/RTL).
//! - Group 2: skip test, then CLA, then OSR, then HLT.

use crate::decoder::Instruction;
use crate::encoding::{group1, group2};
use crate::execute::alu::{add_with_carry, is_negative, rotate_left, rotate_right};
use crate::Registers;

/// Applies a Group 1 instruction to the register file.
pub fn execute_group1(instruction: Instruction, registers: &mut Registers) {
    if instruction.has(group1::CLA) {
        registers.set_ac(0);
    }
    if instruction.has(group1::CLL) {
        registers.set_link(false);
    }
    if instruction.has(group1::CMA) {
        registers.set_ac(!registers.ac());
    }
    if instruction.has(group1::CML) {
        registers.set_link(!registers.link());
    }
    if instruction.has(group1::IAC) {
        let (sum, carry) = add_with_carry(registers.ac(), 1);
        registers.set_ac(sum);
        registers.set_link(carry);
    }

    let places = if instruction.has(group1::TWICE) { 2 } else { 1 };
    if instruction.has(group1::RAR) {
        for _ in 0..places {
            let (ac, link) = rotate_right(registers.ac(), registers.link());
            registers.set_ac(ac);
            registers.set_link(link);
        }
    }
    if instruction.has(group1::RAL) {
        for _ in 0..places {
            let (ac, link) = rotate_left(registers.ac(), registers.link());
            registers.set_ac(ac);
            registers.set_link(link);
        }
    }
}

/// Evaluates the Group 2 skip condition against the current registers.
///
/// The OR family skips when any selected condition holds (minus, zero,
/// link set). The AND family skips when every selected condition holds
/// (plus, nonzero, link clear); with nothing selected it always skips.
#[must_use]
pub const fn skip_condition(instruction: Instruction, registers: &Registers) -> bool {
    let negative = is_negative(registers.ac());
    let zero = registers.ac() == 0;
    let link = registers.link();

    if instruction.has(group2::AND_FAMILY) {
        (!instruction.has(group2::SMA) || !negative)
            && (!instruction.has(group2::SZA) || !zero)
            && (!instruction.has(group2::SNL) || !link)
    } else {
        (instruction.has(group2::SMA) && negative)
            || (instruction.has(group2::SZA) && zero)
            || (instruction.has(group2::SNL) && link)
    }
}

/// Applies a Group 2 instruction to the register file.
///
/// Returns true when the instruction requests a halt; the caller performs
/// the halt after this returns so the final register state is visible.
pub fn execute_group2(instruction: Instruction, registers: &mut Registers, switches: u16) -> bool {
    if skip_condition(instruction, registers) {
        registers.skip();
    }
    if instruction.has(group2::CLA) {
        registers.set_ac(0);
    }
    if instruction.has(group2::OSR) {
        registers.set_ac(registers.ac() | switches);
    }
    instruction.has(group2::HLT)
}
