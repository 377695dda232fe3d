//! No-std hex rendering of frames for console output.

use crate::types::{LinFrame, MAX_BYTES};

/// Hex digits lookup table for fast conversion.
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Longest rendering of a frame: `"XX"` per byte, single spaces between.
pub const MAX_HEX_LEN: usize = MAX_BYTES * 3 - 1;

/// Write a u8 as 2 uppercase hex digits.
///
/// Returns the number of bytes written (always 2).
///
/// # Panics
///
/// Panics if `buf.len() < 2`.
#[inline]
fn write_hex_u8(buf: &mut [u8], value: u8) -> usize {
    debug_assert!(buf.len() >= 2, "buffer too small for hex u8");
    buf[0] = HEX_DIGITS[(value >> 4) as usize];
    buf[1] = HEX_DIGITS[(value & 0xF) as usize];
    2
}

impl LinFrame {
    /// Render the frame as space separated hex (`"92 AA C2"`).
    ///
    /// Returns the number of bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than the rendering; [`MAX_HEX_LEN`] always fits.
    pub fn write_hex(&self, buf: &mut [u8]) -> usize {
        let mut pos = 0;
        for (i, &b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                buf[pos] = b' ';
                pos += 1;
            }
            pos += write_hex_u8(&mut buf[pos..], b);
        }
        pos
    }

    /// Render the frame as a `heapless::String`.
    #[cfg(feature = "heapless")]
    #[must_use]
    pub fn to_hex_string(&self) -> heapless::String<MAX_HEX_LEN> {
        let mut buf = [0u8; MAX_HEX_LEN];
        let len = self.write_hex(&mut buf);
        let mut out = heapless::String::new();
        // ASCII only and never longer than the capacity.
        for &b in &buf[..len] {
            let _ = out.push(b as char);
        }
        out
    }
}
