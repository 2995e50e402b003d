use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcodegen::{QrCode, QrCodeEcc, QrSegment};
use tracing::debug;

use crate::common::{error::EncodeError, metadata::Strength};

// Width of the light border around the symbol, in modules
pub const QUIET_ZONE: u32 = 4;

/// Largest image width or height the encoder will draw. An 8-bit image this
/// size stays well inside the default decoding limits of `image`, so whatever
/// the encoder produces can be loaded back for verification.
pub const MAX_SIZE: u32 = 8192;

// Encoder
//------------------------------------------------------------------------------

/// A rasterized symbol, PNG encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub png: Vec<u8>,
    /// Symbol version, when the encoder knows it
    pub version: Option<u8>,
}

/// Turns text into a PNG image of a QR symbol at a given strength.
pub trait Encoder {
    fn encode(
        &self,
        text: &str,
        strength: Strength,
        width: u32,
        height: u32,
    ) -> Result<Raster, EncodeError>;
}

/// Default [`Encoder`] backed by `qrcodegen`.
///
/// Text is always encoded as a single byte mode segment. The error correction
/// level is exactly the requested one; `qrcodegen` is not allowed to boost it,
/// so the strength reported for an artifact is the strength in the symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolEncoder;

impl Encoder for SymbolEncoder {
    fn encode(
        &self,
        text: &str,
        strength: Strength,
        width: u32,
        height: u32,
    ) -> Result<Raster, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyData);
        }

        debug!(strength = %strength, bytes = text.len(), "Encoding data...");
        let segs = [QrSegment::make_bytes(text.as_bytes())];
        let qr = QrCode::encode_segments_advanced(
            &segs,
            ec_level(strength),
            qrcodegen::Version::MIN,
            qrcodegen::Version::MAX,
            None,
            false,
        )?;
        let version = qr.version().value();

        debug!(version, width, height, "Rendering symbol...");
        let canvas = render(&qr, width, height)?;

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(EncodeError::Png)?;

        Ok(Raster { png, version: Some(version) })
    }
}

fn ec_level(strength: Strength) -> QrCodeEcc {
    match strength {
        Strength::Low => QrCodeEcc::Low,
        Strength::Medium => QrCodeEcc::Medium,
        Strength::High => QrCodeEcc::Quartile,
        Strength::Highest => QrCodeEcc::High,
    }
}

// Render
//------------------------------------------------------------------------------

/// Rejects canvases larger than [`MAX_SIZE`] on either side.
pub fn check_size(width: u32, height: u32) -> Result<(), EncodeError> {
    let requested = width.max(height);
    if requested > MAX_SIZE {
        return Err(EncodeError::SizeTooLarge { requested, max: MAX_SIZE });
    }
    Ok(())
}

// Draws the symbol with its quiet zone at the largest whole number of pixels per
// module, centred on a light canvas of exactly width x height
fn render(qr: &QrCode, width: u32, height: u32) -> Result<GrayImage, EncodeError> {
    check_size(width, height)?;

    let qr_w = qr.size() as u32;
    let total_w = qr_w + 2 * QUIET_ZONE;
    let module_sz = width.min(height) / total_w;
    if module_sz == 0 {
        let requested = width.min(height);
        return Err(EncodeError::SizeTooSmall { requested, required: total_w });
    }

    let left = (width - total_w * module_sz) / 2 + QUIET_ZONE * module_sz;
    let top = (height - total_w * module_sz) / 2 + QUIET_ZONE * module_sz;

    let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));
    for r in 0..qr_w {
        for c in 0..qr_w {
            if !qr.get_module(c as i32, r as i32) {
                continue;
            }
            let (x0, y0) = (left + c * module_sz, top + r * module_sz);
            for y in y0..y0 + module_sz {
                for x in x0..x0 + module_sz {
                    canvas.put_pixel(x, y, Luma([0]));
                }
            }
        }
    }

    Ok(canvas)
}
