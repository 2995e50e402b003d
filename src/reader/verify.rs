use tracing::debug;

use super::{load_png, DecodeHints, Decoder, SymbolDecoder};
use crate::common::{
    error::{MismatchError, QRResult},
    metadata::Strength,
};

/// First bytes of every PNG file
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// Verifier
//------------------------------------------------------------------------------

/// Decodes an image and compares the result byte for byte against the
/// expected text. No trimming, no case folding, no normalization.
pub struct Verifier<'a, D: Decoder> {
    decoder: &'a D,
    hints: DecodeHints,
}

impl<'a, D: Decoder> Verifier<'a, D> {
    pub fn new(decoder: &'a D) -> Self {
        Self { decoder, hints: DecodeHints::MAX_EFFORT }
    }

    pub fn hints(mut self, hints: DecodeHints) -> Self {
        self.hints = hints;
        self
    }

    /// `strength` is only recorded in a mismatch, it does not affect decoding.
    pub fn verify(&self, png: &[u8], expected: &str, strength: Strength) -> QRResult<()> {
        debug!(bytes = png.len(), "Verifying image...");
        let img = load_png(png)?;
        let decoded = self.decoder.decode(&img, self.hints)?;

        if decoded != expected {
            return Err(MismatchError::new(expected, decoded, strength).into());
        }

        debug!(strength = %strength, "Verification passed");
        Ok(())
    }
}

/// Checks that a PNG image holds a QR code reading exactly `expected`.
///
/// The strength used to produce the image is unknown here, so a mismatch
/// reports [`Strength::default()`] (Medium) as a placeholder.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let qr = qrverify::QRBuilder::new("https://example.com").build()?;
/// qrverify::verify(qr.image(), "https://example.com")?;
/// assert!(qrverify::verify(qr.image(), "https://example.org").is_err());
/// # Ok(())
/// # }
/// ```
pub fn verify(png: &[u8], expected: &str) -> QRResult<()> {
    Verifier::new(&SymbolDecoder).verify(png, expected, Strength::default())
}

#[cfg(test)]
mod verify_tests {
    use std::cell::Cell;

    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use test_case::test_case;

    use super::{verify, Verifier};
    use crate::builder::render::{Encoder, SymbolEncoder};
    use crate::common::{
        error::{DecodeError, QRError},
        metadata::Strength,
    };
    use crate::reader::{DecodeHints, Decoder};

    fn png(text: &str, strength: Strength) -> Vec<u8> {
        SymbolEncoder.encode(text, strength, 256, 256).unwrap().png
    }

    fn solid_png(luma: u8) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(128, 128, Luma([luma])));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    // Always reads back the same text, and remembers the hints it was given
    struct FixedDecoder {
        text: &'static str,
        hints: Cell<Option<DecodeHints>>,
    }

    impl Decoder for FixedDecoder {
        fn decode(&self, _img: &DynamicImage, hints: DecodeHints) -> Result<String, DecodeError> {
            self.hints.set(Some(hints));
            Ok(self.text.to_string())
        }
    }

    #[test]
    fn test_pass() {
        let data = "https://example.com";
        verify(&png(data, Strength::Medium), data).unwrap();
    }

    #[test_case("Test", "test"; "case")]
    #[test_case("test", "test "; "trailing space")]
    #[test_case("test", " test"; "leading space")]
    #[test_case("a\nb", "a\r\nb"; "line ending")]
    #[test_case("café", "cafe\u{301}"; "unicode normalization")]
    fn test_strict_comparison(encoded: &str, expected: &str) {
        let err = verify(&png(encoded, Strength::Medium), expected).unwrap_err();
        match err {
            QRError::Mismatch(m) => {
                assert_eq!(m.original(), expected);
                assert_eq!(m.decoded(), encoded);
                assert_eq!(m.original_len(), expected.len());
            }
            e => panic!("Expected mismatch, got {e:?}"),
        }
    }

    #[test]
    fn test_placeholder_strength() {
        let err = verify(&png("abc", Strength::Highest), "abd").unwrap_err();
        match err {
            QRError::Mismatch(m) => assert_eq!(m.strength(), Strength::default()),
            e => panic!("Expected mismatch, got {e:?}"),
        }
    }

    #[test]
    fn test_strength_recorded() {
        let decoder = FixedDecoder { text: "other", hints: Cell::new(None) };
        let err = Verifier::new(&decoder)
            .verify(&png("abc", Strength::Low), "abc", Strength::High)
            .unwrap_err();
        match err {
            QRError::Mismatch(m) => assert_eq!(m.strength(), Strength::High),
            e => panic!("Expected mismatch, got {e:?}"),
        }
    }

    #[test]
    fn test_max_effort_hints() {
        let decoder = FixedDecoder { text: "abc", hints: Cell::new(None) };
        Verifier::new(&decoder).verify(&png("abc", Strength::Low), "abc", Strength::Low).unwrap();
        assert_eq!(decoder.hints.get(), Some(DecodeHints::MAX_EFFORT));

        let hints = DecodeHints { try_harder: false, pure_barcode: false };
        Verifier::new(&decoder)
            .hints(hints)
            .verify(&png("abc", Strength::Low), "abc", Strength::Low)
            .unwrap();
        assert_eq!(decoder.hints.get(), Some(hints));
    }

    #[test_case(0; "black")]
    #[test_case(255; "white")]
    #[test_case(128; "gray")]
    fn test_solid_color_is_decode_failure(luma: u8) {
        let err = verify(&solid_png(luma), "anything").unwrap_err();
        assert!(matches!(err, QRError::DecodeFailure(_)), "Got {err:?}");
    }

    #[test]
    fn test_not_png() {
        let err = verify(b"not an image", "x").unwrap_err();
        assert!(matches!(err, QRError::DecodeFailure(DecodeError::NotPng)));
    }

    #[test]
    fn test_corrupt_png() {
        let mut data = png("corrupt", Strength::Medium);
        data.truncate(40);
        let err = verify(&data, "corrupt").unwrap_err();
        assert!(matches!(err, QRError::DecodeFailure(DecodeError::Container(_))));
    }

    #[test]
    fn test_decoder_not_called_on_bad_container() {
        let decoder = FixedDecoder { text: "x", hints: Cell::new(None) };
        let res = Verifier::new(&decoder).verify(b"\x89PNG broken", "x", Strength::Medium);
        assert!(res.is_err());
        assert_eq!(decoder.hints.get(), None);
    }
}
