//! # qrverify
//!
//! Verified QR code generation. Every QR code this crate hands back has already been decoded
//! and compared byte for byte against its input, so a returned image is known to read back as
//! the exact original text.
//!
//! ## Features
//!
//! - **Verified encoding**: Each generated PNG is decoded again before it is returned
//! - **Automatic escalation**: When no strength is pinned, a code that fails to verify is
//!   regenerated at a stronger error correction level (Medium, then High, then Highest)
//! - **Capacity checks**: Oversized input is rejected up front, with the attempted size and
//!   the limit in the error
//! - **Standalone verification**: Check QR code images produced anywhere else
//! - **Safe errors**: Verification failures never print the payload unless asked to
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrverify::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Starts at Medium and escalates if the code does not read back
//! let qr = QRBuilder::new("Hello, World!").build()?;
//!
//! assert!(qr.image().starts_with(&qrverify::PNG_SIGNATURE));
//! println!("Verified at {} recovery", qr.strength());
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrverify::{QRBuilder, Strength};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("https://example.com")
//!     .strength(Strength::High) // Pinned: tried once, never escalated
//!     .size(512)                // Image width and height in pixels, defaults to 256
//!     .build()?;
//!
//! assert_eq!(qr.strength(), Strength::High);
//! println!("QR metadata: {}", qr.metadata());
//! # Ok(())
//! # }
//! ```
//!
//! ### Verifying an Existing QR Code
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let png = std::fs::read("qr.png")?;
//! match qrverify::verify(&png, "expected data") {
//!     Ok(()) => println!("Verification passed"),
//!     Err(e) => println!("Verification failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Strengths
//!
//! - **Low**: ~7% error correction, up to 2953 bytes
//! - **Medium**: ~15% error correction, up to 2331 bytes (default starting point)
//! - **High**: ~25% error correction, up to 1663 bytes
//! - **Highest**: ~30% error correction, up to 1273 bytes
//!
//! ## Errors
//!
//! Every failure is a [`QRError`]: the input was too large, the encoder failed, no readable
//! symbol was found, or a symbol was read but said something else. The `Display` form of a
//! mismatch only reports lengths; [`QRError::detail`] includes the content.

pub mod builder;
pub(crate) mod common;
pub mod reader;

pub use builder::{encode, EncodedArtifact, QRBuilder, DEFAULT_SIZE, MAX_SIZE};
pub use common::capacity::{
    check_capacity, max_bytes, MAX_BYTES_HIGH, MAX_BYTES_HIGHEST, MAX_BYTES_LOW, MAX_BYTES_MEDIUM,
};
pub use common::error::{DecodeError, EncodeError, MismatchError, QRError, QRResult};
pub use common::metadata::{ParseStrengthError, Strength};
pub use reader::{decode, decode_png, verify, PNG_SIGNATURE};
