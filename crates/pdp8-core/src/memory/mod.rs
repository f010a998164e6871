//! Word-addressed core memory with fixed 12-bit masking.

/// Page geometry and address-field helpers.
pub mod page;

pub use page::{page_of, same_page, OFFSET_MASK, PAGE_COUNT, PAGE_MASK, PAGE_WORDS};

/// Number of bits in a machine word.
pub const WORD_BITS: u32 = 12;

/// Mask applied to every value stored in or read from memory.
pub const WORD_MASK: u16 = (1 << WORD_BITS) - 1;

/// Number of addressable words (4K).
pub const MEMORY_WORDS: usize = 1 << WORD_BITS;

/// Mask applied to every address before it indexes memory.
pub const ADDRESS_MASK: u16 = WORD_MASK;

/// Fixed-size 4K word store.
///
/// Every read and write is masked to [`WORD_MASK`], and every address is
/// masked to [`ADDRESS_MASK`], so no access can fall outside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    words: Box<[u16]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocates a zeroed 4K word store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: vec![0; MEMORY_WORDS].into_boxed_slice(),
        }
    }

    /// Reads the word at `addr`.
    #[must_use]
    pub fn read(&self, addr: u16) -> u16 {
        self.words[usize::from(addr & ADDRESS_MASK)] & WORD_MASK
    }

    /// Stores `value` at `addr`, keeping only the low 12 bits.
    pub fn write(&mut self, addr: u16, value: u16) {
        self.words[usize::from(addr & ADDRESS_MASK)] = value & WORD_MASK;
    }

    /// Replaces memory contents with `image`, starting at address 0.
    ///
    /// Words past the end of `image` are cleared; words past the end of
    /// memory are ignored.
    pub fn load(&mut self, image: &[u16]) {
        self.clear();
        for (slot, word) in self.words.iter_mut().zip(image) {
            *slot = word & WORD_MASK;
        }
    }

    /// Copies `words` into memory starting at `origin`, wrapping at the top
    /// of the address space.
    pub fn load_at(&mut self, origin: u16, words: &[u16]) {
        let mut addr = origin;
        for word in words {
            self.write(addr, *word);
            addr = addr.wrapping_add(1) & ADDRESS_MASK;
        }
    }

    /// Zeroes every word.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Returns the full 4K word image.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MEMORY_WORDS, WORD_MASK};

    #[test]
    fn new_store_is_zeroed_4k() {
        let memory = Memory::new();
        assert_eq!(memory.as_slice().len(), MEMORY_WORDS);
        assert!(memory.as_slice().iter().all(|word| *word == 0));
    }

    #[test]
    fn write_masks_to_twelve_bits() {
        let mut memory = Memory::new();
        memory.write(0o10, 0o17777);
        assert_eq!(memory.read(0o10), 0o7777);
        memory.write(0o11, u16::MAX);
        assert_eq!(memory.read(0o11), WORD_MASK);
    }

    #[test]
    fn addresses_wrap_into_the_4k_space() {
        let mut memory = Memory::new();
        memory.write(0o10005, 0o1234);
        assert_eq!(memory.read(0o0005), 0o1234);
    }

    #[test]
    fn load_replaces_the_whole_image() {
        let mut memory = Memory::new();
        memory.write(0o200, 0o7402);
        memory.load(&[0o7200, 0o17001]);
        assert_eq!(memory.read(0), 0o7200);
        assert_eq!(memory.read(1), 0o7001);
        assert_eq!(memory.read(0o200), 0);
    }

    #[test]
    fn load_at_wraps_past_the_last_address() {
        let mut memory = Memory::new();
        memory.load_at(0o7777, &[1, 2]);
        assert_eq!(memory.read(0o7777), 1);
        assert_eq!(memory.read(0), 2);
    }
}
