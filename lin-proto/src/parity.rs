//! Protected identifier parity.
//!
//! ```text
//! bit 7: P1 = !(ID1 ^ ID3 ^ ID4 ^ ID5)
//! bit 6: P0 =   ID0 ^ ID1 ^ ID2 ^ ID4
//! bits 5..0: ID
//! ```

/// Mask of the 6 identifier bits of a PID byte.
pub const ID_MASK: u8 = 0x3F;

/// Parity bits (already shifted to bits 6 and 7) for an identifier.
///
/// Bits 6 and 7 of `id` are ignored.
#[inline]
#[must_use]
pub const fn parity_bits(id: u8) -> u8 {
    let p0 = bit(id, 0) ^ bit(id, 1) ^ bit(id, 2) ^ bit(id, 4);
    let p1 = !(bit(id, 1) ^ bit(id, 3) ^ bit(id, 4) ^ bit(id, 5)) & 1;
    (p0 << 6) | (p1 << 7)
}

#[inline]
const fn bit(value: u8, n: u8) -> u8 {
    (value >> n) & 1
}

/// Build the protected identifier byte for a 6-bit identifier.
#[inline]
#[must_use]
pub const fn protected_id(id: u8) -> u8 {
    let id = id & ID_MASK;
    id | parity_bits(id)
}

/// Check that the two MSBs of `pid` match the parity of its low six bits.
#[inline]
#[must_use]
pub const fn is_protected_id_valid(pid: u8) -> bool {
    protected_id(pid) == pid
}
