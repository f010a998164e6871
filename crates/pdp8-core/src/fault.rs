use thiserror::Error;

/// Fault classes used for reporting and policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// An instruction bit pattern has no assigned meaning.
    Decode,
    /// An IOT addressed a device that does not exist.
    Device,
}

/// Fatal execution faults.
///
/// A fault stops the machine: the run state latches the fault and the
/// registers and memory are left exactly as they were when it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Operate instruction selects neither micro-op group.
    #[error("cannot decode instruction {instruction:04o} at {pc:04o}")]
    Decode {
        /// Address the instruction was fetched from.
        pc: u16,
        /// Raw instruction word.
        instruction: u16,
    },
    /// IOT to a device code with no attached device.
    #[error("unknown device {device:02o} in instruction {instruction:04o} at {pc:04o}")]
    UnknownDevice {
        /// Address the instruction was fetched from.
        pc: u16,
        /// 6-bit device code.
        device: u8,
        /// Raw instruction word.
        instruction: u16,
    },
}

impl Fault {
    /// Returns the class of this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::Decode { .. } => FaultClass::Decode,
            Self::UnknownDevice { .. } => FaultClass::Device,
        }
    }

    /// Returns the address of the faulting instruction.
    #[must_use]
    pub const fn pc(self) -> u16 {
        match self {
            Self::Decode { pc, .. } | Self::UnknownDevice { pc, .. } => pc,
        }
    }

    /// Returns the raw faulting instruction word.
    #[must_use]
    pub const fn instruction(self) -> u16 {
        match self {
            Self::Decode { instruction, .. } | Self::UnknownDevice { instruction, .. } => {
                instruction
            }
        }
    }
}
