//! Sticky error accumulator.

use lin_proto::ErrorFlags;
use portable_atomic::{AtomicU8, Ordering};

/// Error kinds OR'd in by the tick handler, drained by the consumer.
///
/// Raises between two drains collapse into one mask. A raise racing a
/// drain lands in exactly one of the two drains.
#[derive(Debug)]
pub struct ErrorRegister {
    bits: AtomicU8,
}

impl ErrorRegister {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// Add `flags` to the mask.
    #[inline]
    pub fn raise(&self, flags: ErrorFlags) {
        self.bits.fetch_or(flags.raw(), Ordering::AcqRel);
    }

    /// Read and clear the mask in one step.
    #[inline]
    pub fn take(&self) -> ErrorFlags {
        ErrorFlags(self.bits.swap(0, Ordering::AcqRel))
    }
}

impl Default for ErrorRegister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raises_collapse() {
        let reg = ErrorRegister::new();
        reg.raise(ErrorFlags::STOP_BIT);
        reg.raise(ErrorFlags::SYNC_BYTE);
        reg.raise(ErrorFlags::STOP_BIT);
        assert_eq!(reg.take(), ErrorFlags::STOP_BIT | ErrorFlags::SYNC_BYTE);
    }

    #[test]
    fn test_take_clears() {
        let reg = ErrorRegister::new();
        reg.raise(ErrorFlags::OTHER);
        assert_eq!(reg.take(), ErrorFlags::OTHER);
        assert_eq!(reg.take(), ErrorFlags::NONE);
    }
}
