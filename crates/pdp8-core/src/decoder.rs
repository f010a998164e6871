//! Field extraction for a fetched instruction word.

use crate::encoding::{
    Opcode, INDIRECT_BIT, IOT_DEVICE_MASK, IOT_DEVICE_SHIFT, IOT_OPERATION_MASK,
    OPR_GROUP2_CLEAR_BIT, OPR_GROUP_BIT, PAGE_ZERO_BIT,
};
use crate::memory::{OFFSET_MASK, WORD_MASK};

/// Operate-instruction micro-op group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperateGroup {
    /// Accumulator/link micro-operations.
    One,
    /// Skip tests, clear, switch register, and halt.
    Two,
}

/// A fetched instruction word with typed field accessors.
///
/// Built fresh on every fetch and dropped once the instruction retires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    raw: u16,
}

impl Instruction {
    /// Wraps a raw word, masking it to 12 bits.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self {
            raw: raw & WORD_MASK,
        }
    }

    /// Returns the raw 12-bit word.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Returns the 3-bit opcode.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        Opcode::of_word(self.raw)
    }

    /// Returns true when the indirect (`I`) bit is set.
    #[must_use]
    pub const fn indirect(self) -> bool {
        self.raw & INDIRECT_BIT != 0
    }

    /// Returns true when the page-zero (`Z`) bit is set.
    #[must_use]
    pub const fn page_zero(self) -> bool {
        self.raw & PAGE_ZERO_BIT != 0
    }

    /// Returns the 7-bit page offset.
    #[must_use]
    pub const fn offset(self) -> u16 {
        self.raw & OFFSET_MASK
    }

    /// Returns true when any bit in `mask` is set.
    #[must_use]
    pub const fn has(self, mask: u16) -> bool {
        self.raw & mask != 0
    }

    /// Returns the 6-bit IOT device code.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn device(self) -> u8 {
        ((self.raw & IOT_DEVICE_MASK) >> IOT_DEVICE_SHIFT) as u8
    }

    /// Returns the 3-bit IOT operation field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn io_operation(self) -> u8 {
        (self.raw & IOT_OPERATION_MASK) as u8
    }

    /// Classifies an operate instruction, or `None` for an unassigned group.
    #[must_use]
    pub const fn operate_group(self) -> Option<OperateGroup> {
        if !self.has(OPR_GROUP_BIT) {
            Some(OperateGroup::One)
        } else if !self.has(OPR_GROUP2_CLEAR_BIT) {
            Some(OperateGroup::Two)
        } else {
            None
        }
    }
}
