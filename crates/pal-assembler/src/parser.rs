//! Source line recognizers.
//!
//! A line is stripped of its `/` comment, split into an optional `LABEL,`
//! prefix and a body, and the body is offered to each statement shape in
//! priority order. The first shape that recognizes the body wins.

use pdp8_core::Opcode;

use crate::errors::AssembleErrorKind;
use crate::expr::{Expr, Radix};
use crate::mnemonic::{iot_word, memory_reference, operate_word};

/// Removes a trailing `/` comment and surrounding whitespace.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    line.split_once('/').map_or(line, |(code, _)| code).trim()
}

/// A recognized statement body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `MNEMONIC [I] [Z] expr`.
    MemoryReference {
        /// Base opcode.
        opcode: Opcode,
        /// `I` was written.
        indirect: bool,
        /// `Z` was written.
        page_zero: bool,
        /// Target address expression.
        operand: Expr,
    },
    /// One or more operate mnemonics, already combined.
    Operate(u16),
    /// A teletype IOT mnemonic.
    Iot(u16),
    /// `*digits`: move the instruction counter.
    Origin(String),
    /// `OCTAL` or `DECIMAL`.
    Radix(Radix),
    /// `$`: stop assembling.
    End,
    /// An expression planted as a data word.
    Constant(Expr),
    /// Nothing after the label: reserves one zero word.
    Reserve,
}

impl Statement {
    /// Returns true when the statement occupies a memory word.
    #[must_use]
    pub const fn plants_word(&self) -> bool {
        !matches!(self, Self::Origin(_) | Self::Radix(_) | Self::End)
    }
}

/// A non-blank source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Label defined at the current instruction counter.
    pub label: Option<String>,
    /// The line body.
    pub statement: Statement,
}

type Recognizer = fn(&str) -> Option<Statement>;

const RECOGNIZERS: &[Recognizer] = &[
    memory_reference_line,
    operate_line,
    iot_line,
    origin_line,
    directive_line,
    constant_line,
    reserve_line,
];

/// Parses a comment-stripped, non-empty line.
///
/// # Errors
///
/// Returns [`AssembleErrorKind::Syntax`] when no statement shape matches.
pub fn parse_line(line: &str) -> Result<ParsedLine, AssembleErrorKind> {
    let (label, body) = split_label(line);
    RECOGNIZERS
        .iter()
        .find_map(|recognize| recognize(body))
        .map(|statement| ParsedLine {
            label: label.map(str::to_string),
            statement,
        })
        .ok_or(AssembleErrorKind::Syntax)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
        && chars.all(|ch| ch.is_ascii_alphanumeric())
}

fn split_label(line: &str) -> (Option<&str>, &str) {
    match line.split_once(',') {
        Some((label, body)) if is_identifier(label.trim()) => (Some(label.trim()), body.trim()),
        _ => (None, line.trim()),
    }
}

fn memory_reference_line(body: &str) -> Option<Statement> {
    let mut tokens = body.split_whitespace().peekable();
    let opcode = memory_reference(tokens.next()?)?;
    let indirect = tokens.next_if_eq(&"I").is_some();
    let page_zero = tokens.next_if_eq(&"Z").is_some();
    let operand = Expr::parse(&tokens.collect::<Vec<_>>().join(" "))?;
    Some(Statement::MemoryReference {
        opcode,
        indirect,
        page_zero,
        operand,
    })
}

fn operate_line(body: &str) -> Option<Statement> {
    let names: Vec<&str> = body.split_whitespace().collect();
    operate_word(&names).map(Statement::Operate)
}

fn iot_line(body: &str) -> Option<Statement> {
    iot_word(body).map(Statement::Iot)
}

fn origin_line(body: &str) -> Option<Statement> {
    let digits = body.strip_prefix('*')?.trim();
    (!digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
        .then(|| Statement::Origin(digits.to_string()))
}

fn directive_line(body: &str) -> Option<Statement> {
    match body {
        "OCTAL" => Some(Statement::Radix(Radix::Octal)),
        "DECIMAL" => Some(Statement::Radix(Radix::Decimal)),
        "$" => Some(Statement::End),
        _ => None,
    }
}

fn constant_line(body: &str) -> Option<Statement> {
    Expr::parse(body).map(Statement::Constant)
}

fn reserve_line(body: &str) -> Option<Statement> {
    body.is_empty().then_some(Statement::Reserve)
}
