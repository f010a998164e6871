//! PAL assembler for the PDP-8 simulator.

use env_logger as _;
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tempfile as _;

/// Top-level two-pass assembler pipeline.
pub mod assembler;
/// Instruction and data encoding.
pub mod encoder;
/// Structured assembly error types.
pub mod errors;
/// Offset expressions and literal radix.
pub mod expr;
/// Mnemonic resolution against the simulator's encoding tables.
pub mod mnemonic;
/// Source line recognizers.
pub mod parser;
/// Symbol table and instruction planter.
pub mod symbols;

pub use assembler::{ListingEntry, Pal, Program};
pub use errors::{AssembleError, AssembleErrorKind};
pub use expr::Radix;
