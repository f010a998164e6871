//! Effective-address computation for memory-reference instructions.

use crate::decoder::Instruction;
use crate::memory::{page_of, Memory};

/// Computes the effective address of a memory-reference instruction.
///
/// The 7-bit offset is placed in page zero when `Z` is set, otherwise in the
/// page holding the instruction itself (`instruction_address`, not the
/// already-advanced program counter). With `I` set, that location holds the
/// final address; there is exactly one level of indirection.
#[must_use]
pub fn effective_address(
    instruction: Instruction,
    instruction_address: u16,
    memory: &Memory,
) -> u16 {
    let page = if instruction.page_zero() {
        0
    } else {
        page_of(instruction_address)
    };
    let direct = page | instruction.offset();
    if instruction.indirect() {
        memory.read(direct)
    } else {
        direct
    }
}
