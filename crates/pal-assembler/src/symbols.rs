//! Symbol table and the instruction planter shared by both passes.
//!
//! The planter owns a full 4K code image, the instruction counter, the
//! active literal radix, and the symbol table. Pass 1 plants placeholder
//! words to advance the counter and records labels; pass 2 rewinds the
//! counter and plants the real words against the finished table.

use std::collections::HashMap;

use log::warn;
use pdp8_core::{MEMORY_WORDS, WORD_MASK};

use crate::errors::AssembleErrorKind;
use crate::expr::Radix;

/// A label with its assigned address and definition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Address the label names.
    pub address: u16,
    /// 1-based source line of the (last) definition.
    pub defined_at: usize,
}

/// Symbol table mapping label names to their definitions.
pub type SymbolTable = HashMap<String, Symbol>;

/// Code buffer plus instruction counter.
#[derive(Debug, Clone)]
pub struct InstructionPlanter {
    code: Vec<u16>,
    ic: u32,
    symbols: SymbolTable,
    radix: Radix,
}

impl Default for InstructionPlanter {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionPlanter {
    /// Creates an empty planter at address 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            code: vec![0; MEMORY_WORDS],
            ic: 0,
            symbols: SymbolTable::new(),
            radix: Radix::default(),
        }
    }

    /// Clears code, symbols, counter, and radix.
    pub fn reset(&mut self) {
        self.rewind();
        self.symbols.clear();
    }

    /// Clears code, counter, and radix but keeps the symbol table.
    pub fn rewind(&mut self) {
        self.code.fill(0);
        self.ic = 0;
        self.radix = Radix::default();
    }

    /// Returns the instruction counter.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleErrorKind::AddressOverflow`] once the counter has
    /// moved past the last memory word.
    pub fn ic(&self) -> Result<u16, AssembleErrorKind> {
        u16::try_from(self.ic)
            .ok()
            .filter(|ic| *ic <= WORD_MASK)
            .ok_or(AssembleErrorKind::AddressOverflow)
    }

    /// Sets the instruction counter.
    pub fn org(&mut self, location: u16) {
        self.ic = u32::from(location & WORD_MASK);
    }

    /// Stores `word` at the counter and advances it, returning the address
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleErrorKind::AddressOverflow`] past the top of memory.
    pub fn plant(&mut self, word: u16) -> Result<u16, AssembleErrorKind> {
        let address = self.ic()?;
        self.code[usize::from(address)] = word & WORD_MASK;
        self.ic += 1;
        Ok(address)
    }

    /// Defines `name` at the counter. A later definition replaces an
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleErrorKind::AddressOverflow`] past the top of memory.
    pub fn define(&mut self, name: &str, line: usize) -> Result<(), AssembleErrorKind> {
        let address = self.ic()?;
        let symbol = Symbol {
            address,
            defined_at: line,
        };
        if let Some(previous) = self.symbols.insert(name.to_string(), symbol) {
            warn!(
                "line {line}: {name} redefined as {address:04o} (was {:04o} at line {})",
                previous.address, previous.defined_at
            );
        }
        Ok(())
    }

    /// Looks up a symbol's address.
    #[must_use]
    pub fn evaluate(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).map(|symbol| symbol.address)
    }

    /// Returns the symbol table.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Returns the radix for literals.
    #[must_use]
    pub const fn radix(&self) -> Radix {
        self.radix
    }

    /// Switches the radix for literals on later lines.
    pub const fn set_radix(&mut self, radix: Radix) {
        self.radix = radix;
    }

    /// Returns the code image.
    #[must_use]
    pub fn code(&self) -> &[u16] {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::InstructionPlanter;
    use crate::errors::AssembleErrorKind;
    use crate::expr::Radix;

    #[test]
    fn plant_advances_the_counter() {
        let mut planter = InstructionPlanter::new();
        planter.org(0o200);
        assert_eq!(planter.plant(0o7300), Ok(0o200));
        assert_eq!(planter.plant(0o17777), Ok(0o201));
        assert_eq!(planter.ic(), Ok(0o202));
        assert_eq!(planter.code()[0o200], 0o7300);
        assert_eq!(planter.code()[0o201], 0o7777);
    }

    #[test]
    fn planting_past_the_top_overflows() {
        let mut planter = InstructionPlanter::new();
        planter.org(0o7777);
        assert_eq!(planter.plant(1), Ok(0o7777));
        assert_eq!(planter.plant(2), Err(AssembleErrorKind::AddressOverflow));
        assert_eq!(
            planter.define("X", 9),
            Err(AssembleErrorKind::AddressOverflow)
        );
    }

    #[test]
    fn redefinition_keeps_the_last_value() {
        let mut planter = InstructionPlanter::new();
        planter.define("A", 1).expect("define");
        planter.org(0o300);
        planter.define("A", 5).expect("redefine");
        assert_eq!(planter.evaluate("A"), Some(0o300));
        assert_eq!(planter.symbols()["A"].defined_at, 5);
        assert_eq!(planter.evaluate("B"), None);
    }

    #[test]
    fn rewind_keeps_symbols_and_reset_drops_them() {
        let mut planter = InstructionPlanter::new();
        planter.set_radix(Radix::Decimal);
        planter.org(0o10);
        planter.define("HERE", 1).expect("define");
        planter.plant(5).expect("plant");

        planter.rewind();
        assert_eq!(planter.ic(), Ok(0));
        assert_eq!(planter.radix(), Radix::Octal);
        assert_eq!(planter.code()[0o10], 0);
        assert_eq!(planter.evaluate("HERE"), Some(0o10));

        planter.reset();
        assert!(planter.symbols().is_empty());
    }
}
