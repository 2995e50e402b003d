pub mod artifact;
pub mod escalate;
pub mod render;

pub use artifact::EncodedArtifact;
pub use escalate::encode_verified;
pub use render::{Encoder, Raster, SymbolEncoder, MAX_SIZE};

use crate::{
    common::{error::QRResult, metadata::Strength},
    reader::{Decoder, SymbolDecoder},
};

/// Image width and height used when none is given
pub const DEFAULT_SIZE: u32 = 256;

// Builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    text: &'a str,
    strength: Option<Strength>,
    size: u32,
}

impl<'a> QRBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, strength: None, size: DEFAULT_SIZE }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    /// Pins the error correction strength. A pinned strength is tried once and
    /// never escalated.
    pub fn strength(&mut self, strength: Strength) -> &mut Self {
        self.strength = Some(strength);
        self
    }

    /// Back to the default: start at [`Strength::Medium`] and escalate through
    /// [`Strength::LADDER`] until the code verifies.
    pub fn unset_strength(&mut self) -> &mut Self {
        self.strength = None;
        self
    }

    /// Width and height of the square output image, in pixels
    pub fn size(&mut self, size: u32) -> &mut Self {
        self.size = size;
        self
    }

    pub fn metadata(&self) -> String {
        match self.strength {
            Some(s) => format!("{{ Recovery: {s}, Size: {} }}", self.size),
            None => format!("{{ Recovery: Auto, Size: {} }}", self.size),
        }
    }

    pub fn build(&self) -> QRResult<EncodedArtifact> {
        self.build_with(&SymbolEncoder, &SymbolDecoder)
    }

    /// Same as [`build`](Self::build), with a custom encoder and decoder
    pub fn build_with<E: Encoder, D: Decoder>(
        &self,
        encoder: &E,
        decoder: &D,
    ) -> QRResult<EncodedArtifact> {
        tracing::debug!(bytes = self.text.len(), "Generating verified QR {}...", self.metadata());
        encode_verified(self.text, self.strength, self.size, encoder, decoder)
    }
}

/// Encodes `text` into a verified QR code.
///
/// `None` starts at Medium and escalates on verification failure, `Some` pins
/// the strength.
pub fn encode(text: &str, strength: Option<Strength>, size: u32) -> QRResult<EncodedArtifact> {
    encode_verified(text, strength, size, &SymbolEncoder, &SymbolDecoder)
}
