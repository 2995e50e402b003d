use std::{fs, io, path::Path};

use crate::common::metadata::Strength;

// Encoded artifact
//------------------------------------------------------------------------------

/// A QR code that has been decoded back and matched against its input.
///
/// Only ever produced by a successful round trip, so holding one means the
/// PNG in [`image`](Self::image) reads back as [`text`](Self::text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    image: Vec<u8>,
    text: String,
    strength: Strength,
    size: u32,
    version: Option<u8>,
}

impl EncodedArtifact {
    pub(crate) fn build(
        image: Vec<u8>,
        text: &str,
        strength: Strength,
        size: u32,
        version: Option<u8>,
    ) -> Self {
        Self { image, text: text.to_string(), strength, size, version }
    }

    /// PNG encoded image
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn into_image(self) -> Vec<u8> {
        self.image
    }

    /// The verified input
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The strength that passed verification. May be stronger than requested
    /// when escalation kicked in.
    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Width and height of the image, in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Symbol version, 1 to 40
    pub fn version(&self) -> Option<u8> {
        self.version
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, &self.image)
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {v}, Recovery: {}, Size: {}x{} }}",
                self.strength, self.size, self.size
            ),
            None => format!(
                "{{ Version: None, Recovery: {}, Size: {}x{} }}",
                self.strength, self.size, self.size
            ),
        }
    }
}
