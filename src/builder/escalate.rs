use std::slice;

use tracing::{debug, info, warn};

use super::{
    artifact::EncodedArtifact,
    render::{check_size, Encoder},
};
use crate::{
    common::{
        capacity::{check_capacity, max_bytes},
        error::{QRError, QRResult},
        metadata::Strength,
    },
    reader::{Decoder, Verifier},
};

// Escalation
//------------------------------------------------------------------------------

/// Encodes `text` and proves the result reads back before returning it.
///
/// With `Some(strength)` the strength is pinned: one attempt, and its failure
/// is returned as is. With `None` the strengths of [`Strength::LADDER`] are
/// tried in order until one round trips. Low is never tried. If every attempt
/// fails, the failure of the strongest attempt is returned.
///
/// Oversized input fails with [`QRError::DataTooLarge`], and a size above
/// [`MAX_SIZE`](super::MAX_SIZE) with [`EncodeError::SizeTooLarge`], before
/// the encoder is ever invoked.
///
/// [`EncodeError::SizeTooLarge`]: crate::EncodeError::SizeTooLarge
pub fn encode_verified<E: Encoder, D: Decoder>(
    text: &str,
    strength: Option<Strength>,
    size: u32,
    encoder: &E,
    decoder: &D,
) -> QRResult<EncodedArtifact> {
    let ladder: &[Strength] = match &strength {
        Some(s) => slice::from_ref(s),
        None => &Strength::LADDER,
    };

    check_capacity(text, ladder[0])?;
    check_size(size, size)?;

    let verifier = Verifier::new(decoder);
    let mut last_err = None;

    for &s in ladder {
        // Capacity only shrinks from here on
        if check_capacity(text, s).is_err() {
            let bytes = text.len();
            debug!(strength = %s, bytes, "Payload exceeds capacity, stopping escalation");
            break;
        }

        match attempt(text, s, size, encoder, &verifier) {
            Ok(art) => {
                info!(strength = %s, size, version = ?art.version(), "QR generated and verified");
                return Ok(art);
            }
            Err(e) if strength.is_none() && e.is_retryable() => {
                warn!(strength = %s, error = %e, "Attempt failed");
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    // The first step always passes the capacity check, so some attempt failed
    Err(last_err.unwrap_or_else(|| QRError::DataTooLarge {
        attempted: text.len(),
        limit: max_bytes(ladder[0]),
        strength: ladder[0],
    }))
}

fn attempt<E: Encoder, D: Decoder>(
    text: &str,
    strength: Strength,
    size: u32,
    encoder: &E,
    verifier: &Verifier<D>,
) -> QRResult<EncodedArtifact> {
    debug!(strength = %strength, size, "Generating QR...");
    let raster = encoder.encode(text, strength, size, size)?;

    verifier.verify(&raster.png, text, strength)?;

    Ok(EncodedArtifact::build(raster.png, text, strength, size, raster.version))
}
