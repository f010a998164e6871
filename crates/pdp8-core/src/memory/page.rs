//! Page geometry for memory-reference addressing.
//!
//! The 4K address space is split into 32 pages of 128 words. A
//! memory-reference instruction carries a 7-bit offset that is combined with
//! either page zero or the page holding the instruction.

/// Words per page.
pub const PAGE_WORDS: u16 = 128;

/// Pages in the address space.
pub const PAGE_COUNT: u16 = 32;

/// Mask selecting the offset within a page.
pub const OFFSET_MASK: u16 = PAGE_WORDS - 1;

/// Mask selecting the page base of a 12-bit address.
pub const PAGE_MASK: u16 = 0o7600;

/// Returns the base address of the page containing `addr`.
#[must_use]
pub const fn page_of(addr: u16) -> u16 {
    addr & PAGE_MASK
}

/// Returns true when both addresses fall in the same page.
#[must_use]
pub const fn same_page(a: u16, b: u16) -> bool {
    page_of(a) == page_of(b)
}
