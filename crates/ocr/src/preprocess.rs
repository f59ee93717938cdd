use image::{imageops, DynamicImage, Rgb, RgbImage};
use tabcap_core::ProcessingMode;

/// Neither output dimension ever exceeds this (bounds payload size).
pub const MAX_DIMENSION: u32 = 2000;
/// White border added around the cropped content in enhanced mode.
const BORDER: u32 = 20;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Normalize an input image for submission to the recognizer.
///
/// Every step is total, so normalization can never fail a file: the worst
/// case is an image returned unimproved. Enhanced mode crops to the
/// non-white content (a clean border around the table measurably helps
/// edge detection) and pads a fixed white border; both modes cap the
/// larger dimension at [`MAX_DIMENSION`], preserving aspect ratio.
pub fn normalize(img: DynamicImage, mode: ProcessingMode) -> DynamicImage {
    let mut rgb = img.to_rgb8();

    if mode == ProcessingMode::Enhanced {
        // A uniformly white image has no content bounding box; skip the crop.
        if let Some((x, y, w, h)) = content_bbox(&rgb) {
            rgb = imageops::crop_imm(&rgb, x, y, w, h).to_image();
        }
        rgb = add_border(&rgb, BORDER);
    }

    cap_size(DynamicImage::ImageRgb8(rgb))
}

/// Bounding box `(x, y, width, height)` of all pixels differing from pure
/// white, or `None` when every pixel is white.
fn content_bbox(img: &RgbImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, px) in img.enumerate_pixels() {
        if *px != WHITE {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            found = true;
        }
    }

    found.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

fn add_border(img: &RgbImage, border: u32) -> RgbImage {
    let mut out = RgbImage::from_pixel(
        img.width() + 2 * border,
        img.height() + 2 * border,
        WHITE,
    );
    imageops::replace(&mut out, img, border.into(), border.into());
    out
}

fn cap_size(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, imageops::FilterType::Lanczos3)
    } else {
        img
    }
}
