use crate::memory::{ADDRESS_MASK, WORD_MASK};

/// Architecturally visible registers.
///
/// Every setter masks its input, so the register file can never hold an
/// out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    pc: u16,
    ac: u16,
    link: bool,
}

impl Registers {
    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter, wrapping into the 4K address space.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value & ADDRESS_MASK;
    }

    /// Advances the program counter by one word, skipping an instruction.
    pub const fn skip(&mut self) {
        self.set_pc(self.pc.wrapping_add(1));
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn ac(&self) -> u16 {
        self.ac
    }

    /// Writes the accumulator, keeping only the low 12 bits.
    pub const fn set_ac(&mut self, value: u16) {
        self.ac = value & WORD_MASK;
    }

    /// Reads the link bit.
    #[must_use]
    pub const fn link(&self) -> bool {
        self.link
    }

    /// Writes the link bit.
    pub const fn set_link(&mut self, value: bool) {
        self.link = value;
    }
}
