//! Mnemonic resolution derived from the simulator's encoding tables.

use pdp8_core::encoding::{lookup, GROUP1_TABLE, GROUP2_TABLE, IOT_TABLE, MEMORY_REFERENCE_TABLE};
use pdp8_core::Opcode;

/// Resolves a memory-reference mnemonic to its opcode.
#[must_use]
pub fn memory_reference(name: &str) -> Option<Opcode> {
    lookup(MEMORY_REFERENCE_TABLE, name).map(|entry| Opcode::of_word(entry.word))
}

/// Combines operate mnemonics into one instruction word.
///
/// The line is Group 1 when every name is a Group 1 mnemonic, otherwise
/// Group 2 when every name is a Group 2 mnemonic. Returns `None` for an
/// empty list or a list that mixes the groups.
#[must_use]
pub fn operate_word(names: &[&str]) -> Option<u16> {
    if names.is_empty() {
        return None;
    }
    [GROUP1_TABLE, GROUP2_TABLE].into_iter().find_map(|table| {
        names.iter().try_fold(0, |word, name| {
            lookup(table, name).map(|entry| word | entry.word)
        })
    })
}

/// Resolves a teletype IOT mnemonic to its instruction word.
#[must_use]
pub fn iot_word(name: &str) -> Option<u16> {
    lookup(IOT_TABLE, name).map(|entry| entry.word)
}
