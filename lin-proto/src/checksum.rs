//! LIN frame checksum.
//!
//! 8-bit sum where every carry out of the low byte is added back in,
//! inverted at the end. Which bytes are summed (data only, or PID + data)
//! is chosen by [`ChecksumModel`](crate::ChecksumModel).

/// Calculate the checksum of a byte slice.
#[inline]
#[must_use]
pub fn checksum(data: &[u8]) -> u8 {
    let mut digest = ChecksumDigest::new();
    digest.update_slice(data);
    digest.finalize()
}

/// Checksum digest for incremental calculation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChecksumDigest {
    // Always <= 0xFF after an update.
    sum: u16,
}

impl ChecksumDigest {
    /// Create a new digest.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { sum: 0 }
    }

    /// Add one byte, folding the carry back into the low byte.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        let sum = self.sum + u16::from(byte);
        self.sum = (sum & 0xFF) + (sum >> 8);
    }

    /// Add a byte slice.
    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        for &b in data {
            self.update(b);
        }
    }

    /// Finalize and return the checksum value.
    #[inline]
    #[must_use]
    pub fn finalize(self) -> u8 {
        !(self.sum as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(checksum(&[]), 0xFF);
    }

    #[test]
    fn test_checksum_reference_data() {
        // Folded sum of 4A 55 93 E5 is 0x19.
        assert_eq!(checksum(&[0x4A, 0x55, 0x93, 0xE5]), 0xE6);
    }

    #[test]
    fn test_checksum_carry_fold() {
        // 0xFF + 0xFF = 0x1FE -> 0xFE + 1 = 0xFF -> inverted 0x00
        assert_eq!(checksum(&[0xFF, 0xFF]), 0x00);
    }

    #[test]
    fn test_digest_matches_batch() {
        let data = [0x92, 0xAA, 0x13, 0xF0, 0x7E];
        let mut digest = ChecksumDigest::new();
        for &b in &data {
            digest.update(b);
        }
        assert_eq!(digest.finalize(), checksum(&data));
    }

    #[test]
    fn test_appended_checksum_sums_to_ff() {
        // Summing data plus its checksum always folds to 0xFF.
        let data = [0x01, 0x80, 0xFE, 0x33];
        let mut digest = ChecksumDigest::new();
        digest.update_slice(&data);
        digest.update(checksum(&data));
        assert_eq!(digest.finalize(), 0x00);
    }
}
