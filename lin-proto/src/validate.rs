//! Frame validation.
//!
//! A frame, as stored by the decoder (sync byte stripped), is well-formed
//! when:
//!
//! - it is a lone header (1 byte) or carries a response (3..=10 bytes);
//! - its first byte is a protected identifier with correct parity;
//! - with a response, its last byte is the checksum of the bytes selected
//!   by the [`ChecksumModel`].

use crate::checksum::checksum;
use crate::parity::is_protected_id_valid;
use crate::types::{LinFrame, MAX_BYTES};

/// Smallest frame that carries a response: PID, one data byte, checksum.
const MIN_RESPONSE_LEN: usize = 3;

/// Which bytes the checksum covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChecksumModel {
    /// LIN 1.x: data bytes only.
    Classic,
    /// LIN 2.x: PID and data bytes.
    Enhanced,
}

/// Reason a frame failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte count is 0, 2, or above the maximum.
    Length,
    /// PID parity bits do not match the identifier.
    Parity,
    /// Last byte is not the checksum of the frame.
    Checksum,
}

/// Checksum the frame's last byte should carry under `model`.
///
/// `None` for a header-only or empty frame.
#[must_use]
pub fn expected_checksum(frame: &LinFrame, model: ChecksumModel) -> Option<u8> {
    let bytes = frame.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let end = bytes.len() - 1;
    let start = match model {
        ChecksumModel::Classic => 1,
        ChecksumModel::Enhanced => 0,
    };
    Some(checksum(&bytes[start..end]))
}

/// Validate length, PID parity and checksum.
pub fn validate(frame: &LinFrame, model: ChecksumModel) -> Result<(), FrameError> {
    let len = frame.len();
    if !(len == 1 || (MIN_RESPONSE_LEN..=MAX_BYTES).contains(&len)) {
        return Err(FrameError::Length);
    }

    let pid = frame.pid().ok_or(FrameError::Length)?;
    if !is_protected_id_valid(pid) {
        return Err(FrameError::Parity);
    }

    if let (Some(expected), Some(received)) = (expected_checksum(frame, model), frame.checksum()) {
        if expected != received {
            return Err(FrameError::Checksum);
        }
    }

    Ok(())
}

/// Boolean form of [`validate`].
#[inline]
#[must_use]
pub fn is_valid(frame: &LinFrame, model: ChecksumModel) -> bool {
    validate(frame, model).is_ok()
}

/// Find the checksum model a frame satisfies.
///
/// Enhanced is tried first. Returns `None` when the frame is not valid
/// under either model. A header-only frame reports `Enhanced`, since no
/// checksum is involved.
#[must_use]
pub fn detect_checksum_model(frame: &LinFrame) -> Option<ChecksumModel> {
    [ChecksumModel::Enhanced, ChecksumModel::Classic]
        .into_iter()
        .find(|&model| is_valid(frame, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parity::protected_id;

    fn response_frame(id: u8, data: &[u8], checksum_byte: u8) -> LinFrame {
        let mut frame = LinFrame::new();
        frame.push(protected_id(id)).unwrap();
        for &b in data {
            frame.push(b).unwrap();
        }
        frame.push(checksum_byte).unwrap();
        frame
    }

    #[test]
    fn test_classic_and_enhanced_differ() {
        let frame = response_frame(0x10, &[0x4A, 0x55, 0x93, 0xE5], 0x00);
        assert_eq!(expected_checksum(&frame, ChecksumModel::Classic), Some(0xE6));
        assert_eq!(expected_checksum(&frame, ChecksumModel::Enhanced), Some(0x96));
    }

    #[test]
    fn test_valid_classic_frame() {
        let frame = response_frame(0x10, &[0x4A, 0x55, 0x93, 0xE5], 0xE6);
        assert_eq!(validate(&frame, ChecksumModel::Classic), Ok(()));
        assert_eq!(
            validate(&frame, ChecksumModel::Enhanced),
            Err(FrameError::Checksum)
        );
        assert_eq!(detect_checksum_model(&frame), Some(ChecksumModel::Classic));
    }

    #[test]
    fn test_valid_enhanced_frame() {
        // PID 0x92 + 0xAA = 0x13C -> 0x3D -> inverted 0xC2
        let frame = response_frame(0x12, &[0xAA], 0xC2);
        assert!(is_valid(&frame, ChecksumModel::Enhanced));
        assert!(!is_valid(&frame, ChecksumModel::Classic));
        assert_eq!(detect_checksum_model(&frame), Some(ChecksumModel::Enhanced));
    }

    #[test]
    fn test_validation_idempotent() {
        let frame = response_frame(0x12, &[0xAA], 0xC2);
        let first = is_valid(&frame, ChecksumModel::Enhanced);
        for _ in 0..3 {
            assert_eq!(is_valid(&frame, ChecksumModel::Enhanced), first);
        }
    }

    #[test]
    fn test_header_only_frame_valid() {
        let frame = LinFrame::from_bytes(&[protected_id(0x3C)]).unwrap();
        assert_eq!(validate(&frame, ChecksumModel::Classic), Ok(()));
        assert_eq!(validate(&frame, ChecksumModel::Enhanced), Ok(()));
    }

    #[test]
    fn test_length_rules() {
        assert_eq!(
            validate(&LinFrame::new(), ChecksumModel::Classic),
            Err(FrameError::Length)
        );
        let two = LinFrame::from_bytes(&[protected_id(0x01), 0xFF]).unwrap();
        assert_eq!(validate(&two, ChecksumModel::Classic), Err(FrameError::Length));

        let eight_data = response_frame(0x01, &[0u8; 8], checksum(&[0u8; 8]));
        assert_eq!(eight_data.len(), MAX_BYTES);
        assert_eq!(validate(&eight_data, ChecksumModel::Classic), Ok(()));
    }

    #[test]
    fn test_bad_parity() {
        let frame = LinFrame::from_bytes(&[protected_id(0x12) ^ 0x80]).unwrap();
        assert_eq!(validate(&frame, ChecksumModel::Classic), Err(FrameError::Parity));
    }

    #[test]
    fn test_detect_none_on_corrupt_checksum() {
        let frame = response_frame(0x12, &[0xAA], 0x00);
        assert_eq!(detect_checksum_model(&frame), None);
    }
}
