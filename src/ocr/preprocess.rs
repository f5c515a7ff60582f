use image::{GrayImage, Luma, RgbaImage};

/// Default luminance cut-off for binarization.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Converts a captured frame to a black-and-white image for OCR.
///
/// Each pixel is reduced to its ITU-R 601 luma, then every pixel with luma
/// below `threshold` becomes black and everything else white. This strips
/// the anti-aliasing fringe around the tuner's rendered text. Alpha is
/// ignored.
pub fn binarize(img: &RgbaImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        let value = if luma_601(r, g, b) < threshold { 0u8 } else { 255u8 };
        Luma([value])
    })
}

/// `L = R*299/1000 + G*587/1000 + B*114/1000`, rounded.
fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 299 + g as u32 * 587 + b as u32 * 114;
    // At most 255, since the weights sum to 1000.
    ((weighted + 500) / 1000) as u8
}
