//! Core LIN types: LinFrame, ErrorFlags.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Maximum number of stored bytes in a frame (PID + 8 data + checksum).
pub const MAX_BYTES: usize = 10;

/// Minimum number of stored bytes for a frame to be complete.
pub const MIN_BYTES: usize = 1;

/// Value of the sync byte following the break.
pub const SYNC_BYTE: u8 = 0x55;

/// Returned when appending to a frame that already holds [`MAX_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PushError;

/// A decoded LIN frame, without the sync byte.
///
/// Fixed capacity, `Copy`, and const-constructible so it can live in
/// statically allocated queues shared with an interrupt handler.
#[derive(Clone, Copy, Debug)]
pub struct LinFrame {
    bytes: [u8; MAX_BYTES],
    len: u8,
}

impl LinFrame {
    /// Create an empty frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_BYTES],
            len: 0,
        }
    }

    /// Create a frame holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PushError> {
        if bytes.len() > MAX_BYTES {
            return Err(PushError);
        }
        let mut frame = Self::new();
        frame.bytes[..bytes.len()].copy_from_slice(bytes);
        frame.len = bytes.len() as u8;
        Ok(frame)
    }

    /// Append a byte.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<(), PushError> {
        let len = self.len as usize;
        if len >= MAX_BYTES {
            return Err(PushError);
        }
        self.bytes[len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Drop all bytes.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once the frame holds [`MAX_BYTES`] bytes.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len as usize >= MAX_BYTES
    }

    /// The stored bytes, PID first.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// The protected identifier byte (with parity bits), if any.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> Option<u8> {
        self.as_bytes().first().copied()
    }

    /// The 6-bit frame identifier, if any.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<u8> {
        self.pid().map(|pid| pid & crate::parity::ID_MASK)
    }

    /// Data bytes between the PID and the checksum.
    ///
    /// Empty for a header-only frame.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        let bytes = self.as_bytes();
        if bytes.len() < 2 {
            return &[];
        }
        &bytes[1..bytes.len() - 1]
    }

    /// The trailing checksum byte, if the frame carries a response.
    #[must_use]
    pub fn checksum(&self) -> Option<u8> {
        let bytes = self.as_bytes();
        if bytes.len() < 2 {
            return None;
        }
        bytes.last().copied()
    }
}

// Bytes past `len` are stale and do not take part in equality.
impl PartialEq for LinFrame {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for LinFrame {}

impl Default for LinFrame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:02x}", self.as_bytes());
    }
}

/// Decoder error kinds as a bitfield.
///
/// The decoder ORs kinds in as they happen; the consumer drains the whole
/// mask at once, so several raises between two drains show up as one value
/// with every corresponding bit set.
///
/// # Example
///
/// ```
/// use lin_proto::ErrorFlags;
///
/// let flags = ErrorFlags::START_BIT | ErrorFlags::BUFFER_OVERRUN;
/// assert!(flags.contains(ErrorFlags::START_BIT));
/// assert!(!flags.contains(ErrorFlags::SYNC_BYTE));
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ErrorFlags(pub u8);

impl ErrorFlags {
    pub const FRAME_TOO_SHORT: Self = Self(1 << 0);
    pub const FRAME_TOO_LONG: Self = Self(1 << 1);
    pub const START_BIT: Self = Self(1 << 2);
    pub const STOP_BIT: Self = Self(1 << 3);
    pub const SYNC_BYTE: Self = Self(1 << 4);
    pub const BUFFER_OVERRUN: Self = Self(1 << 5);
    pub const OTHER: Self = Self(1 << 6);

    /// No errors.
    pub const NONE: Self = Self(0);

    /// Short names, in bit order.
    const NAMES: [(Self, &'static str); 7] = [
        (Self::FRAME_TOO_SHORT, "SHRT"),
        (Self::FRAME_TOO_LONG, "LONG"),
        (Self::START_BIT, "STRT"),
        (Self::STOP_BIT, "STOP"),
        (Self::SYNC_BYTE, "SYNC"),
        (Self::BUFFER_OVERRUN, "OVRN"),
        (Self::OTHER, "OTHR"),
    ];

    /// Check if all the given kind(s) are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, flags: ErrorFlags) -> bool {
        (self.0 & flags.0) == flags.0
    }

    /// Check if any of the given kind(s) are set.
    #[inline]
    #[must_use]
    pub const fn intersects(self, flags: ErrorFlags) -> bool {
        (self.0 & flags.0) != 0
    }

    /// Get the raw u8 value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Short names of the set kinds, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.intersects(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for ErrorFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ErrorFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ErrorFlags {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for ErrorFlags {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for ErrorFlags {
    type Output = Self;

    #[inline]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl core::fmt::Display for ErrorFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorFlags {
    fn format(&self, f: defmt::Formatter) {
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                defmt::write!(f, " ");
            }
            defmt::write!(f, "{=str}", name);
        }
    }
}
