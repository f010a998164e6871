//! Top-level two-pass assembler.
//!
//! 1. **Pass 1** walks every line, defining labels at the instruction
//!    counter and planting placeholder words so the counter advances exactly
//!    as it will in pass 2. Expressions are never evaluated here.
//! 2. **Pass 2** rewinds the counter and plants the real words, resolving
//!    expressions against the finished symbol table.
//!
//! Both passes use the same line recognizers, so a syntax error is reported
//! from pass 1.

use std::fmt;

use log::debug;
use pdp8_core::{Cpu, Tracer};

use crate::encoder::encode_statement;
use crate::errors::{AssembleError, AssembleErrorKind};
use crate::expr::parse_literal;
use crate::parser::{parse_line, strip_comment, ParsedLine, Statement};
use crate::symbols::{InstructionPlanter, SymbolTable};

/// One planted word in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Address of the word.
    pub address: u16,
    /// Assembled word.
    pub word: u16,
    /// 1-based source line.
    pub line: usize,
    /// Source text, comment included.
    pub source: String,
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04o}  {:04o}  {:>4}  {}",
            self.address, self.word, self.line, self.source
        )
    }
}

/// An assembled memory image with its symbols and listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<u16>,
    symbols: SymbolTable,
    listing: Vec<ListingEntry>,
}

impl Program {
    /// Returns the full 4K image.
    #[must_use]
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Returns the word at `address`.
    #[must_use]
    pub fn word(&self, address: u16) -> u16 {
        self.words
            .get(usize::from(address))
            .copied()
            .unwrap_or_default()
    }

    /// Looks up a label's address.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).map(|symbol| symbol.address)
    }

    /// Returns every label, sorted by address and then name.
    #[must_use]
    pub fn symbols(&self) -> Vec<(&str, u16)> {
        let mut symbols: Vec<(&str, u16)> = self
            .symbols
            .iter()
            .map(|(name, symbol)| (name.as_str(), symbol.address))
            .collect();
        symbols.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        symbols
    }

    /// Returns the planted words in source order.
    #[must_use]
    pub fn listing(&self) -> &[ListingEntry] {
        &self.listing
    }

    /// Replaces the machine's memory with this image.
    pub fn load_into<T: Tracer>(&self, cpu: &mut Cpu<T>) {
        cpu.load_image(&self.words);
    }
}

/// The two-pass assembler.
#[derive(Debug, Clone, Default)]
pub struct Pal {
    planter: InstructionPlanter,
}

impl Pal {
    /// Creates an assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles `source` into a memory image.
    ///
    /// State from any earlier assembly is discarded first.
    ///
    /// # Errors
    ///
    /// Returns the first [`AssembleError`] met; later lines are not examined.
    pub fn assemble(&mut self, source: &str) -> Result<Program, AssembleError> {
        self.planter.reset();
        let lines = numbered_lines(source);

        debug!("pass 1: {} lines", lines.len());
        self.pass1(&lines)?;
        debug!("pass 1 defined {} symbols", self.planter.symbols().len());

        self.planter.rewind();
        let listing = self.pass2(&lines)?;
        debug!("pass 2 planted {} words", listing.len());

        Ok(Program {
            words: self.planter.code().to_vec(),
            symbols: self.planter.symbols().clone(),
            listing,
        })
    }

    /// Assembles a single line at instruction counter 0 and returns the word
    /// it plants there.
    ///
    /// # Errors
    ///
    /// Returns the [`AssembleError`] for the line.
    pub fn instruction(&mut self, text: &str) -> Result<u16, AssembleError> {
        self.assemble(text).map(|program| program.word(0))
    }

    fn pass1(&mut self, lines: &[(usize, &str)]) -> Result<(), AssembleError> {
        for &(number, text) in lines {
            let parsed = parse(number, text)?;
            let done = self
                .place(number, &parsed, false)
                .map_err(|kind| kind.at(number, text))?;
            if done {
                break;
            }
            if parsed.statement.plants_word() {
                self.planter.plant(0).map_err(|kind| kind.at(number, text))?;
            }
        }
        Ok(())
    }

    fn pass2(&mut self, lines: &[(usize, &str)]) -> Result<Vec<ListingEntry>, AssembleError> {
        let mut listing = Vec::new();
        for &(number, text) in lines {
            let parsed = parse(number, text)?;
            let located = |kind: AssembleErrorKind| kind.at(number, text);
            if self.place(number, &parsed, true).map_err(located)? {
                break;
            }
            if !parsed.statement.plants_word() {
                continue;
            }
            let encoded = self.planter.ic().and_then(|here| {
                encode_statement(
                    &parsed.statement,
                    here,
                    self.planter.symbols(),
                    self.planter.radix(),
                )
            });
            if let Some(word) = encoded.map_err(located)? {
                let address = self.planter.plant(word).map_err(located)?;
                listing.push(ListingEntry {
                    address,
                    word,
                    line: number,
                    source: text.trim_end().to_string(),
                });
            }
        }
        Ok(listing)
    }

    /// Applies the parts of a line both passes share: label definition in
    /// pass 1, and the counter and radix directives. Returns true at `$`.
    fn place(
        &mut self,
        number: usize,
        parsed: &ParsedLine,
        second_pass: bool,
    ) -> Result<bool, AssembleErrorKind> {
        if let Some(label) = parsed.label.as_ref().filter(|_| !second_pass) {
            self.planter.define(label, number)?;
        }
        match &parsed.statement {
            Statement::Origin(digits) => {
                let location = parse_literal(digits, self.planter.radix())?;
                self.planter.org(location);
            }
            Statement::Radix(radix) => self.planter.set_radix(*radix),
            Statement::End => return Ok(true),
            _ => {}
        }
        Ok(false)
    }
}

fn numbered_lines(source: &str) -> Vec<(usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text))
        .filter(|(_, text)| !strip_comment(text).is_empty())
        .collect()
}

fn parse(number: usize, text: &str) -> Result<ParsedLine, AssembleError> {
    parse_line(strip_comment(text)).map_err(|kind| kind.at(number, text))
}
