//! Twelve-bit arithmetic and rotate primitives over accumulator and link.

use crate::memory::WORD_MASK;

/// Sign bit of a 12-bit word.
pub const SIGN_BIT: u16 = 0o4000;

/// Adds two words modulo 2^12.
///
/// Returns the masked sum and the carry out, which becomes the new link.
#[must_use]
pub const fn add_with_carry(a: u16, b: u16) -> (u16, bool) {
    let sum = (a & WORD_MASK) as u32 + (b & WORD_MASK) as u32;
    let masked = sum & WORD_MASK as u32;
    #[allow(clippy::cast_possible_truncation)]
    let result = masked as u16;
    (result, masked != sum)
}

/// Rotates link and accumulator one place right.
///
/// The link enters bit 11 and bit 0 becomes the new link.
#[must_use]
pub const fn rotate_right(ac: u16, link: bool) -> (u16, bool) {
    let ac = ac & WORD_MASK;
    let rotated = (ac >> 1) | if link { SIGN_BIT } else { 0 };
    (rotated, ac & 1 != 0)
}

/// Rotates link and accumulator one place left.
///
/// The link enters bit 0 and bit 11 becomes the new link.
#[must_use]
pub const fn rotate_left(ac: u16, link: bool) -> (u16, bool) {
    let ac = ac & WORD_MASK;
    let rotated = ((ac << 1) & WORD_MASK) | if link { 1 } else { 0 };
    (rotated, ac & SIGN_BIT != 0)
}

/// Returns true when bit 11 is set.
#[must_use]
pub const fn is_negative(word: u16) -> bool {
    word & SIGN_BIT != 0
}

/// Interprets a word as a two's complement value.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn to_signed(word: u16) -> i16 {
    let word = word & WORD_MASK;
    if is_negative(word) {
        word as i16 - (1 << 12)
    } else {
        word as i16
    }
}
