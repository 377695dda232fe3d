//! Consumer-side frame validation and logging.
//!
//! Runs in the consumer task only, never in the tick handler.

use defmt::{error, info, warn};
use lin_proto::{detect_checksum_model, validate, ChecksumModel, ErrorFlags, FrameError, LinFrame};

/// Checksum model selected by cargo features, `None` to accept either.
pub const EXPECTED_MODEL: Option<ChecksumModel> = if cfg!(feature = "checksum-classic") {
    Some(ChecksumModel::Classic)
} else if cfg!(feature = "checksum-enhanced") {
    Some(ChecksumModel::Enhanced)
} else {
    None
};

/// Validate a frame against [`EXPECTED_MODEL`].
///
/// On success returns the model the checksum matched, or `None` for a
/// header-only frame.
pub fn check_frame(frame: &LinFrame) -> Result<Option<ChecksumModel>, FrameError> {
    if let Some(model) = EXPECTED_MODEL {
        validate(frame, model)?;
        return Ok(frame.checksum().map(|_| model));
    }
    match detect_checksum_model(frame) {
        Some(model) => Ok(frame.checksum().map(|_| model)),
        // Report length and parity before blaming the checksum.
        None => Err(validate(frame, ChecksumModel::Classic)
            .err()
            .unwrap_or(FrameError::Checksum)),
    }
}

/// Log one decoded frame.
pub fn report_frame(frame: &LinFrame) {
    let hex = frame.to_hex_string();
    match check_frame(frame) {
        Ok(model) => info!("frame [{=str}] {}", hex.as_str(), model),
        Err(e) => warn!("bad frame [{=str}]: {}", hex.as_str(), e),
    }
}

/// Log drained decoder errors, if any.
pub fn report_errors(errors: ErrorFlags) {
    if !errors.is_empty() {
        error!("decoder errors: {}", errors);
    }
}
