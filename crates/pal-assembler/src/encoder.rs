//! Instruction and data encoding (pass 2).

use pdp8_core::encoding::{INDIRECT_BIT, PAGE_ZERO_BIT};
use pdp8_core::memory::{page_of, same_page, OFFSET_MASK};
use pdp8_core::Opcode;

use crate::errors::AssembleErrorKind;
use crate::expr::Radix;
use crate::parser::Statement;
use crate::symbols::SymbolTable;

/// Encodes a memory-reference instruction at `here` targeting `address`.
///
/// A target on the instruction's own page is encoded without `Z`. A target
/// on page 0 gets `Z`. `Z` written explicitly always selects page 0 and
/// keeps only the low seven bits of the target.
///
/// # Errors
///
/// Returns [`AssembleErrorKind::PageFault`] when the target is reachable
/// neither from the current page nor from page 0.
pub fn encode_memory_reference(
    opcode: Opcode,
    indirect: bool,
    page_zero: bool,
    address: u16,
    here: u16,
) -> Result<u16, AssembleErrorKind> {
    let on_page = same_page(address, here);
    if !page_zero && !on_page && page_of(address) != 0 {
        return Err(AssembleErrorKind::PageFault {
            address,
            here: page_of(here),
        });
    }
    let page_zero = page_zero || !on_page;

    let mut word = opcode.base_word() | (address & OFFSET_MASK);
    if indirect {
        word |= INDIRECT_BIT;
    }
    if page_zero {
        word |= PAGE_ZERO_BIT;
    }
    Ok(word)
}

/// Encodes the word a statement plants at `here`, or `None` for statements
/// that plant nothing.
///
/// # Errors
///
/// Returns an error for undefined symbols, malformed literals, or page
/// faults. A constant line naming a single undefined symbol is reported as
/// a syntax error.
pub fn encode_statement(
    statement: &Statement,
    here: u16,
    symbols: &SymbolTable,
    radix: Radix,
) -> Result<Option<u16>, AssembleErrorKind> {
    let word = match statement {
        Statement::MemoryReference {
            opcode,
            indirect,
            page_zero,
            operand,
        } => {
            let address = operand.evaluate(here, symbols, radix)?;
            encode_memory_reference(*opcode, *indirect, *page_zero, address, here)?
        }
        Statement::Operate(word) | Statement::Iot(word) => *word,
        Statement::Constant(expr) => match expr.evaluate(here, symbols, radix) {
            Err(AssembleErrorKind::UndefinedSymbol(_)) if expr.is_bare_symbol() => {
                return Err(AssembleErrorKind::Syntax)
            }
            result => result?,
        },
        Statement::Reserve => 0,
        Statement::Origin(_) | Statement::Radix(_) | Statement::End => return Ok(None),
    };
    Ok(Some(word))
}
