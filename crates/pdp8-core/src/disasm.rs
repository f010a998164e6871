//! Instruction disassembly.
//!
//! Produces PAL source text for a word. Every line produced here assembles
//! back to the same word when placed at the same address; words with no
//! mnemonic spelling are rendered as octal constants.

use std::fmt;
use std::iter;

use crate::decoder::{Instruction, OperateGroup};
use crate::encoding::{group1, group2, IOT_TABLE};
use crate::memory::{page_of, OFFSET_MASK};
use crate::{Memory, Opcode, ADDRESS_MASK, MEMORY_WORDS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled memory word.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address the word was read from.
    pub address: u16,
    /// Raw word.
    pub word: u16,
    /// PAL text for the word.
    pub text: String,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}  {:04o}  {}", self.address, self.word, self.text)
    }
}

/// Disassembles `before` words ahead of `center` through `after` words past it.
///
/// Addresses wrap at the top of memory, and a window wider than memory
/// stops after one full lap.
#[must_use]
pub fn disassemble_window(
    center: u16,
    before: u16,
    after: u16,
    memory: &Memory,
) -> Vec<DisassemblyRow> {
    let first = center.wrapping_sub(before) & ADDRESS_MASK;
    let rows = (usize::from(before) + usize::from(after) + 1).min(MEMORY_WORDS);
    iter::successors(Some(first), |address| Some(address.wrapping_add(1) & ADDRESS_MASK))
        .take(rows)
        .map(|address| {
            let word = memory.read(address);
            DisassemblyRow {
                address,
                word,
                text: disassemble(word, address),
            }
        })
        .collect()
}

/// Renders `word`, located at `address`, as a PAL source line.
#[must_use]
pub fn disassemble(word: u16, address: u16) -> String {
    let instruction = Instruction::new(word);
    let opcode = instruction.opcode();
    if opcode.is_memory_reference() {
        return memory_reference(instruction, address);
    }
    let names = match opcode {
        Opcode::Iot => iot_names(instruction),
        _ => operate_names(instruction),
    };
    names.map_or_else(|| format!("{:04o}", instruction.raw()), |names| names.join(" "))
}

fn memory_reference(instruction: Instruction, address: u16) -> String {
    let target = if instruction.page_zero() {
        instruction.offset()
    } else {
        page_of(address) | (instruction.offset() & OFFSET_MASK)
    };
    let mut text = String::from(instruction.opcode().mnemonic());
    if instruction.indirect() {
        text.push_str(" I");
    }
    if instruction.page_zero() {
        text.push_str(" Z");
    }
    text.push_str(&format!(" {target:04o}"));
    text
}

fn iot_names(instruction: Instruction) -> Option<Vec<&'static str>> {
    IOT_TABLE
        .iter()
        .find(|entry| entry.word == instruction.raw())
        .map(|entry| vec![entry.name])
}

/// Returns the micro-op mnemonics of an operate word in execution order, or
/// `None` when no combination of mnemonics spells it.
#[must_use]
pub fn operate_names(instruction: Instruction) -> Option<Vec<&'static str>> {
    match instruction.operate_group()? {
        OperateGroup::One => group1_names(instruction),
        OperateGroup::Two => group2_names(instruction),
    }
}

fn group1_names(instruction: Instruction) -> Option<Vec<&'static str>> {
    let twice = instruction.has(group1::TWICE);
    if twice && !instruction.has(group1::RAR) && !instruction.has(group1::RAL) {
        return None;
    }
    let mut names = Vec::new();
    for (bit, name) in [
        (group1::CLA, "CLA"),
        (group1::CLL, "CLL"),
        (group1::CMA, "CMA"),
        (group1::CML, "CML"),
        (group1::IAC, "IAC"),
    ] {
        if instruction.has(bit) {
            names.push(name);
        }
    }
    if instruction.has(group1::RAR) {
        names.push(if twice { "RTR" } else { "RAR" });
    }
    if instruction.has(group1::RAL) {
        names.push(if twice { "RTL" } else { "RAL" });
    }
    if names.is_empty() {
        names.push("NOP");
    }
    Some(names)
}

fn group2_names(instruction: Instruction) -> Option<Vec<&'static str>> {
    let mut names = Vec::new();
    if instruction.has(group2::AND_FAMILY) {
        let tests = [
            (group2::SMA, "SPA"),
            (group2::SZA, "SNA"),
            (group2::SNL, "SZL"),
        ];
        for (bit, name) in tests {
            if instruction.has(bit) {
                names.push(name);
            }
        }
        if names.is_empty() {
            names.push("SKP");
        }
    } else {
        for (bit, name) in [
            (group2::SMA, "SMA"),
            (group2::SZA, "SZA"),
            (group2::SNL, "SNL"),
        ] {
            if instruction.has(bit) {
                names.push(name);
            }
        }
    }
    let has_test = !names.is_empty();
    for (bit, name) in [
        (group2::CLA, "CLA"),
        (group2::OSR, "OSR"),
        (group2::HLT, "HLT"),
    ] {
        if instruction.has(bit) {
            names.push(name);
        }
    }
    // a bare CLA reads as the Group 1 form
    if names.is_empty() || (!has_test && names == ["CLA"]) {
        return None;
    }
    Some(names)
}
