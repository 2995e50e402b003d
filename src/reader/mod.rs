pub mod prepare;
pub mod verify;

pub use verify::{verify, Verifier, PNG_SIGNATURE};

use image::{DynamicImage, GrayImage, ImageFormat};
use tracing::debug;

use crate::common::error::{DecodeError, QRResult};

// Decode hints
//------------------------------------------------------------------------------

/// How hard a [`Decoder`] should look for a symbol.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct DecodeHints {
    /// Spend extra passes on the image before giving up
    pub try_harder: bool,
    /// The image is a lone symbol with no surrounding scene
    pub pure_barcode: bool,
}

impl DecodeHints {
    pub const MAX_EFFORT: Self = Self { try_harder: true, pure_barcode: true };
}

// Decoder
//------------------------------------------------------------------------------

/// Reads the text of a QR symbol out of an image.
pub trait Decoder {
    fn decode(&self, img: &DynamicImage, hints: DecodeHints) -> Result<String, DecodeError>;
}

/// Default [`Decoder`] backed by `rqrr`.
///
/// Every pass from [`prepare::passes`] is searched for grids. The first grid
/// that decodes wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolDecoder;

impl Decoder for SymbolDecoder {
    fn decode(&self, img: &DynamicImage, hints: DecodeHints) -> Result<String, DecodeError> {
        let gray = img.to_luma8();
        let mut last_err = None;

        for (i, pass) in prepare::passes(&gray, hints).enumerate() {
            debug!(pass = i, width = pass.width(), height = pass.height(), "Locating symbol...");
            match read_symbol(&pass) {
                Ok(Some(msg)) => return Ok(msg),
                Ok(None) => {}
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.map_or(DecodeError::SymbolNotFound, DecodeError::Unreadable))
    }
}

// Ok(None) when no grid was found at all
fn read_symbol(img: &GrayImage) -> Result<Option<String>, rqrr::DeQRError> {
    let (w, h) = img.dimensions();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        img.get_pixel(x as u32, y as u32)[0]
    });

    let grids = prepared.detect_grids();
    debug!(grids = grids.len(), "Decoding grids...");

    let mut last_err = None;
    for g in grids.iter() {
        match g.decode() {
            Ok((_meta, msg)) => return Ok(Some(msg)),
            Err(e) => last_err = Some(e),
        }
    }

    match last_err {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

// Decode
//------------------------------------------------------------------------------

/// Decodes a QR symbol from an image with maximum effort.
pub fn decode(img: &DynamicImage) -> QRResult<String> {
    Ok(SymbolDecoder.decode(img, DecodeHints::MAX_EFFORT)?)
}

/// Decodes a QR symbol from PNG bytes with maximum effort.
pub fn decode_png(png: &[u8]) -> QRResult<String> {
    let img = load_png(png)?;
    decode(&img)
}

pub(crate) fn load_png(png: &[u8]) -> Result<DynamicImage, DecodeError> {
    if !png.starts_with(&PNG_SIGNATURE) {
        return Err(DecodeError::NotPng);
    }
    image::load_from_memory_with_format(png, ImageFormat::Png).map_err(DecodeError::Container)
}
