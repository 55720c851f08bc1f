//! Image saving utilities.

use std::io::Cursor;
use std::path::Path;

use image::{ImageBuffer, ImageError, ImageFormat, Rgb};

use crate::error::{Error, Result};

use super::{StyledImage, RGB_CHANNELS};

/// Save a stylized image to disk.
///
/// The image is:
/// 1. Denormalized from [0, 1] to [0, 255]
/// 2. Saved to the specified path (format inferred from extension)
///
/// # Arguments
///
/// * `image` - HWC array with values in [0, 1]
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if the array is not RGB or the image cannot be saved.
pub fn save_image<P: AsRef<Path>>(image: &StyledImage, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let img = array_to_image(image)?;

    let save_error = |source: ImageError| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(save_error)?;

    // Encode fully in memory so a failed encode never leaves a partial file
    let mut encoded = Cursor::new(Vec::new());
    if format == ImageFormat::Jpeg {
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut encoded, quality);
        img.write_with_encoder(encoder).map_err(save_error)?;
    } else {
        img.write_to(&mut encoded, format).map_err(save_error)?;
    }

    std::fs::write(path, encoded.into_inner())?;

    tracing::debug!("Wrote {}x{} image to {}", img.width(), img.height(), path.display());

    Ok(())
}

/// Convert an HWC array in [0, 1] to an RGB image.
#[allow(clippy::cast_possible_truncation)]
fn array_to_image(image: &StyledImage) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>> {
    let (height, width, channels) = image.dim();
    if channels != RGB_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: format!("(H, W, {RGB_CHANNELS})"),
            actual: format!("{:?}", image.shape()),
        });
    }

    // Safe: x and y are bounded by the array dimensions, which came from a u32-sized image
    Ok(ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            denormalize(image[[y, x, 0]]),
            denormalize(image[[y, x, 1]]),
            denormalize(image[[y, x, 2]]),
        ])
    }))
}

/// Denormalize a value from [0, 1] to [0, 255] with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
