use std::fmt::{Debug, Formatter};

use thiserror::Error;

use super::metadata::Strength;

// Error
//------------------------------------------------------------------------------

/// Every failure the pipeline can report.
///
/// The [`Display`](std::fmt::Display) form is safe to log: it never contains
/// the payload. Use [`QRError::detail`] where the full content is acceptable.
///
/// Wrapped causes are rendered inline and not exposed through
/// [`Error::source`](std::error::Error::source), so a report that walks the
/// chain prints each of them once.
#[derive(Debug, Error)]
pub enum QRError {
    #[error("data too large: {attempted} bytes exceeds {limit} byte limit for {strength} recovery")]
    DataTooLarge { attempted: usize, limit: usize, strength: Strength },

    #[error("failed to create QR code: {0}")]
    EncodeFailure(EncodeError),

    #[error("failed to read QR code: {0}")]
    DecodeFailure(DecodeError),

    #[error(transparent)]
    Mismatch(MismatchError),
}

impl QRError {
    /// Like `to_string`, except that a mismatch includes both payloads.
    pub fn detail(&self) -> String {
        match self {
            Self::Mismatch(m) => m.detail(),
            _ => self.to_string(),
        }
    }

    /// Whether a stronger error correction level might succeed where this failed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::DataTooLarge { .. } => false,
            Self::EncodeFailure(e) => e.is_retryable(),
            Self::DecodeFailure(_) | Self::Mismatch(_) => true,
        }
    }
}

impl From<EncodeError> for QRError {
    fn from(e: EncodeError) -> Self {
        Self::EncodeFailure(e)
    }
}

impl From<DecodeError> for QRError {
    fn from(e: DecodeError) -> Self {
        Self::DecodeFailure(e)
    }
}

impl From<MismatchError> for QRError {
    fn from(e: MismatchError) -> Self {
        Self::Mismatch(e)
    }
}

pub type QRResult<T> = Result<T, QRError>;

// Encoder errors
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("empty data")]
    EmptyData,

    #[error("{0}")]
    Symbol(qrcodegen::DataTooLong),

    #[error("cannot fit a {required}x{required} module symbol into {requested}x{requested} pixels")]
    SizeTooSmall { requested: u32, required: u32 },

    #[error("{requested}x{requested} pixels exceeds the {max}x{max} pixel limit")]
    SizeTooLarge { requested: u32, max: u32 },

    #[error("failed to generate PNG: {0}")]
    Png(image::ImageError),
}

impl EncodeError {
    // Input and canvas problems stay the same at every strength
    fn is_retryable(&self) -> bool {
        !matches!(self, Self::EmptyData | Self::SizeTooSmall { .. } | Self::SizeTooLarge { .. })
    }
}

impl From<qrcodegen::DataTooLong> for EncodeError {
    fn from(e: qrcodegen::DataTooLong) -> Self {
        Self::Symbol(e)
    }
}

// Decoder errors
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a PNG image")]
    NotPng,

    #[error("failed to decode PNG: {0}")]
    Container(image::ImageError),

    #[error("symbol not found")]
    SymbolNotFound,

    #[error("unreadable symbol: {0}")]
    Unreadable(rqrr::DeQRError),
}

// Mismatch
//------------------------------------------------------------------------------

/// A symbol was read, but its content differs from what was expected.
#[derive(Clone, PartialEq, Eq, Error)]
#[error(
    "verification failed: decoded {} bytes do not match expected {} bytes (recovery: {strength})",
    .decoded.len(),
    .original.len()
)]
pub struct MismatchError {
    original: String,
    decoded: String,
    strength: Strength,
}

impl MismatchError {
    pub fn new(
        original: impl Into<String>,
        decoded: impl Into<String>,
        strength: Strength,
    ) -> Self {
        Self { original: original.into(), decoded: decoded.into(), strength }
    }

    /// The expected content
    pub fn original(&self) -> &str {
        &self.original
    }

    /// What the symbol actually contained
    pub fn decoded(&self) -> &str {
        &self.decoded
    }

    pub fn original_len(&self) -> usize {
        self.original.len()
    }

    pub fn decoded_len(&self) -> usize {
        self.decoded.len()
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Full message with both payloads. Not for logs that may be shared.
    pub fn detail(&self) -> String {
        format!(
            "verification failed: decoded {:?} does not match original {:?} (recovery: {})",
            self.decoded, self.original, self.strength
        )
    }
}

impl Debug for MismatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MismatchError")
            .field("original_len", &self.original.len())
            .field("decoded_len", &self.decoded.len())
            .field("strength", &self.strength)
            .finish()
    }
}
