//! Host-facing configuration and run-loop result types.

use crate::{Registers, RunState};

/// Top-level configuration for a simulator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Dispatches execution events to the attached tracer.
    pub tracing_enabled: bool,
    /// Front-panel switch register read by `OSR`.
    pub switch_register: u16,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tracing_enabled: true,
            switch_register: 0,
        }
    }
}

/// Options for one call to [`crate::Cpu::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Address to seed the program counter with; `None` resumes at the
    /// current program counter.
    pub start: Option<u16>,
    /// Stop after exactly one instruction.
    pub stepping: bool,
}

impl RunOptions {
    /// Runs from the current program counter until halt.
    #[must_use]
    pub const fn resume() -> Self {
        Self {
            start: None,
            stepping: false,
        }
    }

    /// Runs from `start` until halt.
    #[must_use]
    pub const fn from(start: u16) -> Self {
        Self {
            start: Some(start),
            stepping: false,
        }
    }

    /// Executes a single instruction at the current program counter.
    #[must_use]
    pub const fn step() -> Self {
        Self {
            start: None,
            stepping: true,
        }
    }

    /// Returns these options with single-stepping switched on or off.
    #[must_use]
    pub const fn stepping(mut self, stepping: bool) -> Self {
        self.stepping = stepping;
        self
    }
}

/// Status after one instruction retires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired and the machine may continue.
    Retired,
    /// Instruction executed `HLT`.
    Halted,
}

/// Aggregated result of a [`crate::Cpu::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of instructions retired during this call.
    pub steps: u64,
    /// Status of the last retired instruction.
    pub final_step: StepOutcome,
}

/// Point-in-time copy of the processor state (memory excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuSnapshot {
    /// Register file.
    pub registers: Registers,
    /// Execution state, including any latched fault.
    pub run_state: RunState,
    /// Teleprinter ready flag.
    pub punch_ready: bool,
}
