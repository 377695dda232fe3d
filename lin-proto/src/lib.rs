//! LIN frame types, decoder error flags, and frame validation.
//!
//! This crate holds everything about a LIN frame that does not depend on
//! how the bits were sampled:
//!
//! - **Types**: the data handed from the bit-level decoder to its consumer
//!   - [`LinFrame`] - Decoded frame bytes (identifier, data, checksum)
//!   - [`ErrorFlags`] - Sticky bitfield of decoder error kinds
//!
//! - **Checksum**: LIN one's-complement sum with carry folding
//!   - [`checksum()`] - Checksum of a byte slice
//!   - [`ChecksumDigest`] - Incremental checksum
//!
//! - **Identifier parity**
//!   - [`protected_id()`] - Add the two parity bits to a 6-bit identifier
//!   - [`is_protected_id_valid()`] - Check the parity bits of an identifier byte
//!
//! - **Validation**: frame well-formedness
//!   - [`validate()`] / [`is_valid()`] - Length, parity and checksum checks
//!   - [`ChecksumModel`] - Classic (data only) or enhanced (identifier + data)
//!
//! # Frame Layout
//!
//! ```text
//! break | sync 0x55 | PID | data 0..=8 | checksum
//! ```
//!
//! The sync byte is consumed by the decoder and never stored. A stored
//! frame is either a lone header (`PID`) or `PID, data.., checksum`.
//!
//! # Example
//!
//! ```
//! use lin_proto::{checksum, protected_id, validate, ChecksumModel, LinFrame};
//!
//! let pid = protected_id(0x10);
//! let data = [0x4A, 0x55, 0x93, 0xE5];
//! assert_eq!(checksum(&data), 0xE6);
//!
//! let mut frame = LinFrame::new();
//! frame.push(pid).unwrap();
//! for b in data {
//!     frame.push(b).unwrap();
//! }
//! frame.push(0xE6).unwrap();
//! assert_eq!(validate(&frame, ChecksumModel::Classic), Ok(()));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`heapless`**: Enable [`LinFrame::to_hex_string()`]
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
mod fmt;
pub mod parity;
pub mod types;
pub mod validate;

// Re-export types at crate root for convenience
pub use checksum::{checksum, ChecksumDigest};
pub use fmt::MAX_HEX_LEN;
pub use parity::{is_protected_id_valid, parity_bits, protected_id, ID_MASK};
pub use types::{ErrorFlags, LinFrame, PushError, MAX_BYTES, MIN_BYTES, SYNC_BYTE};
pub use validate::{
    detect_checksum_model, expected_checksum, is_valid, validate, ChecksumModel, FrameError,
};
