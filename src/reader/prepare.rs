use std::{borrow::Cow, iter};

use image::{imageops, imageops::FilterType, GrayImage, Luma};
use imageproc::contrast::otsu_level;

use super::DecodeHints;

// Images no wider than this get an upscaled pass when trying harder
const UPSCALE_LIMIT: u32 = 512;

// Prepare
//------------------------------------------------------------------------------

/// Grayscale variants of one image, in the order a decoder should try them.
///
/// The untouched image always comes first. Trying harder adds a globally
/// thresholded copy and, for small images, a 2x nearest neighbour upscale.
/// Assuming a pure barcode adds a copy with a light border, for synthetic
/// images that were cropped right up to the symbol.
///
/// Variants are built lazily, only once the iterator reaches them.
pub fn passes(img: &GrayImage, hints: DecodeHints) -> impl Iterator<Item = Cow<'_, GrayImage>> {
    let small = img.width().max(img.height()) <= UPSCALE_LIMIT;
    let variants: [(bool, fn(&GrayImage) -> GrayImage); 3] = [
        (hints.try_harder, binarize),
        (hints.try_harder && small, upscale),
        (hints.pure_barcode, pad),
    ];

    let rest = variants
        .into_iter()
        .filter(|&(on, _)| on)
        .map(move |(_, prepare)| Cow::Owned(prepare(img)));

    iter::once(Cow::Borrowed(img)).chain(rest)
}

/// Thresholds at the Otsu level of the image
pub fn binarize(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    let mut res = img.clone();
    res.pixels_mut().for_each(|p| *p = if p[0] > level { Luma([255]) } else { Luma([0]) });
    res
}

/// Nearest neighbour 2x upscale
pub fn upscale(img: &GrayImage) -> GrayImage {
    imageops::resize(img, img.width() * 2, img.height() * 2, FilterType::Nearest)
}

/// Surrounds the image with a light border an eighth of its larger side wide
pub fn pad(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let border = (w.max(h) / 8).max(1);
    let mut canvas = GrayImage::from_pixel(w + 2 * border, h + 2 * border, Luma([255]));
    imageops::replace(&mut canvas, img, border as i64, border as i64);
    canvas
}
