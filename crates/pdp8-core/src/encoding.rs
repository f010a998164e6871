//! Opcode, addressing-mode, and micro-operation encoding tables.
//!
//! Every table here is an immutable constant shared by the simulator, the
//! disassembler, and the assembler.

/// Bit position of the 3-bit opcode field.
pub const OPCODE_SHIFT: u32 = 9;

/// Indirect (`I`) addressing bit of a memory-reference instruction.
pub const INDIRECT_BIT: u16 = 0o0400;

/// Page-zero (`Z`) addressing bit of a memory-reference instruction.
pub const PAGE_ZERO_BIT: u16 = 0o0200;

/// Operate-group selector: clear for Group 1, set for Group 2.
pub const OPR_GROUP_BIT: u16 = 0o0400;

/// Must be clear (with [`OPR_GROUP_BIT`] set) for a Group 2 instruction.
pub const OPR_GROUP2_CLEAR_BIT: u16 = 0o0001;

/// Group 1 micro-operation bits.
pub mod group1 {
    /// Clear the accumulator (sequence 1).
    pub const CLA: u16 = 0o0200;
    /// Clear the link (sequence 1).
    pub const CLL: u16 = 0o0100;
    /// Complement the accumulator (sequence 2).
    pub const CMA: u16 = 0o0040;
    /// Complement the link (sequence 2).
    pub const CML: u16 = 0o0020;
    /// Rotate accumulator and link right (sequence 4).
    pub const RAR: u16 = 0o0010;
    /// Rotate accumulator and link left (sequence 4).
    pub const RAL: u16 = 0o0004;
    /// Rotate two positions instead of one.
    pub const TWICE: u16 = 0o0002;
    /// Increment the accumulator (sequence 3).
    pub const IAC: u16 = 0o0001;
}

/// Group 2 micro-operation bits.
pub mod group2 {
    /// Clear the accumulator after the skip test.
    pub const CLA: u16 = 0o0200;
    /// Test accumulator sign (minus in the OR family, plus in the AND family).
    pub const SMA: u16 = 0o0100;
    /// Test accumulator zero (zero in the OR family, nonzero in the AND family).
    pub const SZA: u16 = 0o0040;
    /// Test link (set in the OR family, clear in the AND family).
    pub const SNL: u16 = 0o0020;
    /// Selects the AND family of skip tests.
    pub const AND_FAMILY: u16 = 0o0010;
    /// Inclusive OR of the switch register into the accumulator.
    pub const OSR: u16 = 0o0004;
    /// Halt, after every other micro-operation.
    pub const HLT: u16 = 0o0002;
}

/// Mask of the IOT device-select field.
pub const IOT_DEVICE_MASK: u16 = 0o0770;

/// Bit position of the IOT device-select field.
pub const IOT_DEVICE_SHIFT: u32 = 3;

/// Mask of the IOT operation field.
pub const IOT_OPERATION_MASK: u16 = 0o0007;

/// The eight primary opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Logical AND into the accumulator.
    And = 0,
    /// Two's complement add into the accumulator.
    Tad = 1,
    /// Increment memory and skip if zero.
    Isz = 2,
    /// Deposit and clear the accumulator.
    Dca = 3,
    /// Jump to subroutine.
    Jms = 4,
    /// Jump.
    Jmp = 5,
    /// Input/output transfer.
    Iot = 6,
    /// Operate (microcoded group).
    Opr = 7,
}

impl Opcode {
    /// All opcodes, indexed by their 3-bit code.
    pub const ALL: [Self; 8] = [
        Self::And,
        Self::Tad,
        Self::Isz,
        Self::Dca,
        Self::Jms,
        Self::Jmp,
        Self::Iot,
        Self::Opr,
    ];

    /// Decodes the low three bits of `bits` into an opcode.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Self {
        Self::ALL[(bits & 0o7) as usize]
    }

    /// Extracts the opcode from the top three bits of an instruction word.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn of_word(word: u16) -> Self {
        Self::from_u3((word >> OPCODE_SHIFT) as u8)
    }

    /// Returns the assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Tad => "TAD",
            Self::Isz => "ISZ",
            Self::Dca => "DCA",
            Self::Jms => "JMS",
            Self::Jmp => "JMP",
            Self::Iot => "IOT",
            Self::Opr => "OPR",
        }
    }

    /// Returns the instruction word with only the opcode field set.
    #[must_use]
    pub const fn base_word(self) -> u16 {
        (self as u16) << OPCODE_SHIFT
    }

    /// Returns true for the six opcodes that take a memory operand.
    #[must_use]
    pub const fn is_memory_reference(self) -> bool {
        (self as u8) < Self::Iot as u8
    }
}

/// A named instruction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MnemonicEntry {
    /// Assembler mnemonic.
    pub name: &'static str,
    /// Full instruction word the mnemonic stands for.
    pub word: u16,
}

const fn entry(name: &'static str, word: u16) -> MnemonicEntry {
    MnemonicEntry { name, word }
}

/// Memory-reference mnemonics.
pub const MEMORY_REFERENCE_TABLE: &[MnemonicEntry] = &[
    entry("AND", 0o0000),
    entry("TAD", 0o1000),
    entry("ISZ", 0o2000),
    entry("DCA", 0o3000),
    entry("JMS", 0o4000),
    entry("JMP", 0o5000),
];

/// Group 1 operate mnemonics.
pub const GROUP1_TABLE: &[MnemonicEntry] = &[
    entry("NOP", 0o7000),
    entry("CLA", 0o7200),
    entry("CLL", 0o7100),
    entry("CMA", 0o7040),
    entry("CML", 0o7020),
    entry("IAC", 0o7001),
    entry("RAR", 0o7010),
    entry("RAL", 0o7004),
    entry("RTR", 0o7012),
    entry("RTL", 0o7006),
];

/// Group 2 operate mnemonics.
pub const GROUP2_TABLE: &[MnemonicEntry] = &[
    entry("SMA", 0o7500),
    entry("SZA", 0o7440),
    entry("SNL", 0o7420),
    entry("SPA", 0o7510),
    entry("SNA", 0o7450),
    entry("SZL", 0o7430),
    entry("SKP", 0o7410),
    entry("CLA", 0o7600),
    entry("OSR", 0o7404),
    entry("HLT", 0o7402),
];

/// Teleprinter and keyboard/reader IOT mnemonics.
pub const IOT_TABLE: &[MnemonicEntry] = &[
    entry("KCF", 0o6030),
    entry("KSF", 0o6031),
    entry("KCC", 0o6032),
    entry("KRS", 0o6034),
    entry("KRB", 0o6036),
    entry("TFL", 0o6040),
    entry("TSF", 0o6041),
    entry("TCF", 0o6042),
    entry("TPC", 0o6044),
    entry("TLS", 0o6046),
];

/// Looks up `name` in `table`.
#[must_use]
pub fn lookup(table: &[MnemonicEntry], name: &str) -> Option<MnemonicEntry> {
    table.iter().copied().find(|entry| entry.name == name)
}
