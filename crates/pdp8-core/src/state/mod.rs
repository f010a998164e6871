//! Architectural CPU state model primitives.

/// Program counter, accumulator, and link.
pub mod registers;

pub use registers::Registers;

use crate::Fault;

/// Execution state of the simulated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Not executing; a single step completed or nothing has run yet.
    #[default]
    Stopped,
    /// Fetching and executing instructions.
    Running,
    /// Stopped by an `HLT` micro-operation.
    Halted,
    /// Stopped by a fatal fault; state is frozen for inspection.
    FaultLatched(Fault),
}

impl RunState {
    /// Returns true only while instructions are being executed.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns the latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::FaultLatched(fault) => Some(fault),
            Self::Stopped | Self::Running | Self::Halted => None,
        }
    }
}
