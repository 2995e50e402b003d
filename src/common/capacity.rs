use super::{
    error::{QRError, QRResult},
    metadata::Strength,
};

// Capacity
//------------------------------------------------------------------------------

// Byte mode capacity of a version 40 symbol at each strength
pub const MAX_BYTES_LOW: usize = 2953;
pub const MAX_BYTES_MEDIUM: usize = 2331;
pub const MAX_BYTES_HIGH: usize = 1663;
pub const MAX_BYTES_HIGHEST: usize = 1273;

/// Maximum payload, in UTF-8 bytes, that fits the largest symbol at `strength`.
pub const fn max_bytes(strength: Strength) -> usize {
    match strength {
        Strength::Low => MAX_BYTES_LOW,
        Strength::Medium => MAX_BYTES_MEDIUM,
        Strength::High => MAX_BYTES_HIGH,
        Strength::Highest => MAX_BYTES_HIGHEST,
    }
}

/// Fails with [`QRError::DataTooLarge`] when `text` cannot fit any symbol at `strength`.
pub fn check_capacity(text: &str, strength: Strength) -> QRResult<()> {
    let attempted = text.len();
    let limit = max_bytes(strength);
    if attempted > limit {
        return Err(QRError::DataTooLarge { attempted, limit, strength });
    }
    Ok(())
}
