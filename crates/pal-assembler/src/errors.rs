//! Structured error reporting for assembler passes.
//!
//! Every failure names the 1-based source line and the offending text:
//! ```text
//! line 4: address 0400 is not reachable from page 0200: TAD 400
//! ```

use thiserror::Error;

/// Classification of assembly failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleErrorKind {
    /// The line matches no statement shape.
    #[error("syntax error")]
    Syntax,
    /// A symbol was referenced but never defined.
    #[error("undefined symbol {0}")]
    UndefinedSymbol(String),
    /// A memory reference targets a page the instruction cannot reach.
    #[error("address {address:04o} is not reachable from page {here:04o}")]
    PageFault {
        /// Resolved target address.
        address: u16,
        /// Page of the instruction being assembled.
        here: u16,
    },
    /// A numeric literal is malformed for the active radix or exceeds 12 bits.
    #[error("invalid literal {0}")]
    InvalidLiteral(String),
    /// The instruction counter ran past the top of memory.
    #[error("instruction counter overflowed past 7777")]
    AddressOverflow,
}

impl AssembleErrorKind {
    /// Attaches a source location to this failure.
    #[must_use]
    pub fn at(self, line: usize, text: &str) -> AssembleError {
        AssembleError {
            kind: self,
            line,
            text: text.trim().to_string(),
        }
    }
}

/// An assembly failure with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: {text}")]
pub struct AssembleError {
    /// What went wrong.
    pub kind: AssembleErrorKind,
    /// 1-based source line number.
    pub line: usize,
    /// Source text of the line, trimmed.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::AssembleErrorKind;

    #[test]
    fn display_names_line_and_text() {
        let err = AssembleErrorKind::PageFault {
            address: 0o400,
            here: 0o200,
        }
        .at(4, "  TAD 400   ");
        assert_eq!(
            err.to_string(),
            "line 4: address 0400 is not reachable from page 0200: TAD 400"
        );
    }

    #[test]
    fn undefined_symbol_names_the_symbol() {
        let err = AssembleErrorKind::UndefinedSymbol("LOOP".into()).at(2, "JMP LOOP");
        assert_eq!(err.to_string(), "line 2: undefined symbol LOOP: JMP LOOP");
    }
}
