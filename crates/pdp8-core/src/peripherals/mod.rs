//! IOT-attached devices.

/// Console teleprinter (punch) and keyboard/reader stub.
pub mod teletype;

pub use teletype::{Punch, Reader, PUNCH_DEVICE, READER_DEVICE};
