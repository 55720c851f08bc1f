//! Image loading utilities.

use std::path::Path;

use image::{ImageError, ImageReader, RgbImage};
use ndarray::Array4;

use crate::error::{Error, Result};

use super::{validate_format, ImageTensor, RGB_CHANNELS};

/// Load an image from disk and convert to a normalized tensor.
///
/// The image is:
/// 1. Checked against the supported extensions
/// 2. Decoded by content, whatever the extension says, and converted to RGB
/// 3. Normalized to [0, 1] range
/// 4. Returned as NHWC tensor (1, height, width, 3)
///
/// # Errors
///
/// Returns an error if the format is unsupported or the file cannot be decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageTensor> {
    let path = path.as_ref();

    validate_format(path)?;

    let decode_error = |source: ImageError| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    // Sniff the contents; the extension only gates which formats are accepted
    let img = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| decode_error(ImageError::IoError(err)))?
        .decode()
        .map_err(decode_error)?;

    Ok(image_to_tensor(&img.to_rgb8()))
}

/// Convert an RGB image to a normalized NHWC tensor.
#[must_use]
pub fn image_to_tensor(rgb: &RgbImage) -> ImageTensor {
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    Array4::from_shape_fn((1, height, width, RGB_CHANNELS), |(_, y, x, c)| {
        // Safe: x and y are bounded by the image dimensions, which are u32
        #[allow(clippy::cast_possible_truncation)]
        let pixel = rgb.get_pixel(x as u32, y as u32);
        f32::from(pixel[c]) / 255.0
    })
}
