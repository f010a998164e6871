//! Offset expressions: `.`, a symbol, or a literal, optionally combined with
//! one more term by `+` or `-`, with an optional leading `-`.

use pdp8_core::WORD_MASK;

use crate::errors::AssembleErrorKind;
use crate::symbols::SymbolTable;

/// Number base for literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radix {
    /// Base 8.
    #[default]
    Octal,
    /// Base 10.
    Decimal,
}

impl Radix {
    /// Returns the numeric base.
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Octal => 8,
            Self::Decimal => 10,
        }
    }
}

/// Parses a digit string in `radix`, rejecting values wider than a word.
///
/// # Errors
///
/// Returns [`AssembleErrorKind::InvalidLiteral`] for digits outside the radix
/// or values above `7777` octal.
pub fn parse_literal(text: &str, radix: Radix) -> Result<u16, AssembleErrorKind> {
    u16::from_str_radix(text, radix.base())
        .ok()
        .filter(|value| *value <= WORD_MASK)
        .ok_or_else(|| AssembleErrorKind::InvalidLiteral(text.to_string()))
}

/// One operand of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// `.`, the current instruction counter.
    Here,
    /// A symbol reference.
    Symbol(String),
    /// Unevaluated literal digits.
    Literal(String),
}

impl Term {
    fn evaluate(
        &self,
        here: u16,
        symbols: &SymbolTable,
        radix: Radix,
    ) -> Result<u16, AssembleErrorKind> {
        match self {
            Self::Here => Ok(here),
            Self::Symbol(name) => symbols
                .get(name)
                .map(|symbol| symbol.address)
                .ok_or_else(|| AssembleErrorKind::UndefinedSymbol(name.clone())),
            Self::Literal(digits) => parse_literal(digits, radix),
        }
    }
}

/// A parsed offset expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    /// Leading `-`.
    pub negated: bool,
    /// First operand.
    pub first: Term,
    /// Optional second operand; `true` means subtract.
    pub rest: Option<(bool, Term)>,
}

impl Expr {
    /// Parses `text`, returning `None` unless the whole text is an expression.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut cursor = Cursor::new(text);
        let negated = cursor.eat('-');
        let first = cursor.term()?;
        let rest = match cursor.operator() {
            Some(subtract) => Some((subtract, cursor.term()?)),
            None => None,
        };
        cursor.at_end().then_some(Self {
            negated,
            first,
            rest,
        })
    }

    /// Returns true when the expression is a single symbol and nothing else.
    #[must_use]
    pub const fn is_bare_symbol(&self) -> bool {
        !self.negated && self.rest.is_none() && matches!(self.first, Term::Symbol(_))
    }

    /// Evaluates the expression at instruction counter `here`, wrapping to
    /// twelve bits.
    ///
    /// # Errors
    ///
    /// Returns an error for undefined symbols or malformed literals.
    pub fn evaluate(
        &self,
        here: u16,
        symbols: &SymbolTable,
        radix: Radix,
    ) -> Result<u16, AssembleErrorKind> {
        let mut value = self.first.evaluate(here, symbols, radix)?;
        if self.negated {
            value = value.wrapping_neg();
        }
        if let Some((subtract, term)) = &self.rest {
            let operand = term.evaluate(here, symbols, radix)?;
            value = if *subtract {
                value.wrapping_sub(operand)
            } else {
                value.wrapping_add(operand)
            };
        }
        Ok(value & WORD_MASK)
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_space(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, ch: char) -> bool {
        self.skip_space();
        match self.rest.strip_prefix(ch) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn operator(&mut self) -> Option<bool> {
        if self.eat('+') {
            Some(false)
        } else if self.eat('-') {
            Some(true)
        } else {
            None
        }
    }

    fn term(&mut self) -> Option<Term> {
        self.skip_space();
        if self.eat('.') {
            return Some(Term::Here);
        }
        let first = self.rest.chars().next()?;
        let end = self
            .rest
            .find(|ch: char| !ch.is_ascii_alphanumeric())
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        if first.is_ascii_digit() {
            if !token.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            self.rest = rest;
            Some(Term::Literal(token.to_string()))
        } else if first.is_ascii_alphabetic() {
            self.rest = rest;
            Some(Term::Symbol(token.to_string()))
        } else {
            None
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_space();
        self.rest.is_empty()
    }
}
