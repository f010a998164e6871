//! Instruction-set simulator for a 12-bit, 4K-word minicomputer.

/// Word store and page arithmetic.
pub mod memory;
pub use memory::{Memory, ADDRESS_MASK, MEMORY_WORDS, WORD_BITS, WORD_MASK};

/// Opcode, addressing-mode, and micro-operation encoding tables.
pub mod encoding;
pub use encoding::{lookup, MnemonicEntry, Opcode};

/// Instruction field extraction.
pub mod decoder;
pub use decoder::{Instruction, OperateGroup};

/// Fault taxonomy for instructions the machine cannot execute.
pub mod fault;
pub use fault::{Fault, FaultClass};

/// Architectural register and run-state model.
pub mod state;
pub use state::{Registers, RunState};

/// Host-facing configuration and run-control types.
pub mod api;
pub use api::{CoreConfig, CpuSnapshot, RunOptions, RunOutcome, StepOutcome};

/// Execution observation hooks.
pub mod trace;
pub use trace::{NullTracer, RecordingTracer, TraceEvent, Tracer};

/// Console teletype devices reached through IOT.
pub mod peripherals;
pub use peripherals::{Punch, Reader};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::Cpu;

/// Word-to-source disassembly.
pub mod disasm;
pub use disasm::{disassemble, disassemble_window, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
