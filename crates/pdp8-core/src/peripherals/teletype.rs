//! Console teleprinter and keyboard/reader.
//!
//! The punch keeps a one-bit ready flag: printing a character sets it, an
//! explicit clear resets it, and programs poll it with a skip operation
//! before sending the next character.

/// Device code of the keyboard/reader.
pub const READER_DEVICE: u8 = 0o03;

/// Device code of the teleprinter/punch.
pub const PUNCH_DEVICE: u8 = 0o04;

/// Punch operation bit: skip the next instruction if the flag is set.
pub const PUNCH_SKIP_IF_READY: u8 = 0o1;

/// Punch operation bit: clear the ready flag.
pub const PUNCH_CLEAR_FLAG: u8 = 0o2;

/// Punch operation bit: print the accumulator and set the ready flag.
pub const PUNCH_PRINT: u8 = 0o4;

const CHARACTER_MASK: u16 = 0o177;

/// Teleprinter output device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Punch {
    ready: bool,
    output: String,
}

impl Punch {
    /// Creates a punch with a clear flag and empty output.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: false,
            output: String::new(),
        }
    }

    /// Performs the IOT operation bits in order: test, clear, print.
    ///
    /// Returns true when the next instruction should be skipped. A zero
    /// accumulator prints nothing but still sets the flag.
    pub fn transfer(&mut self, operation: u8, accumulator: u16) -> bool {
        let skip = operation & PUNCH_SKIP_IF_READY != 0 && self.ready;
        if operation & PUNCH_CLEAR_FLAG != 0 {
            self.ready = false;
        }
        if operation & PUNCH_PRINT != 0 {
            if accumulator != 0 {
                #[allow(clippy::cast_possible_truncation)]
                let character = char::from((accumulator & CHARACTER_MASK) as u8);
                self.output.push(character);
            }
            self.ready = true;
        }
        skip
    }

    /// Returns the ready flag.
    #[must_use]
    pub const fn ready(&self) -> bool {
        self.ready
    }

    /// Returns everything printed so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns and clears everything printed so far.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// Keyboard/reader stub; accepts every operation and never skips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reader;

impl Reader {
    /// Performs an IOT operation. Reads are not modelled.
    #[must_use]
    pub const fn transfer(self, _operation: u8) -> bool {
        false
    }
}
