//! Batch-dimension handling and spatial resizing of image tensors.

use image::{imageops::FilterType, Rgb32FImage};
use ndarray::{Array3, Array4, Axis};

use crate::error::{Error, Result};

use super::{ImageTensor, RGB_CHANNELS, STYLE_IMAGE_SIZE};

/// Add a leading batch dimension of size 1.
#[must_use]
pub fn add_batch_dim(image: Array3<f32>) -> Array4<f32> {
    image.insert_axis(Axis(0))
}

/// Drop the leading batch dimension, turning (1, H, W, C) into (H, W, C).
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the batch size is not 1.
pub fn strip_batch_dim(tensor: Array4<f32>) -> Result<Array3<f32>> {
    let batch = tensor.len_of(Axis(0));
    if batch != 1 {
        return Err(Error::ShapeMismatch {
            expected: "batch size 1".to_string(),
            actual: format!("batch size {batch} in {:?}", tensor.shape()),
        });
    }

    Ok(tensor.index_axis_move(Axis(0), 0))
}

/// Resize the spatial dimensions of an NHWC tensor with bilinear filtering.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the tensor is not a single RGB image.
pub fn resize_tensor(tensor: &ImageTensor, width: u32, height: u32) -> Result<ImageTensor> {
    let (batch, src_h, src_w, channels) = tensor.dim();
    if batch != 1 || channels != RGB_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: format!("(1, H, W, {RGB_CHANNELS})"),
            actual: format!("{:?}", tensor.shape()),
        });
    }

    // Safe: the tensor was built from a u32-sized image
    #[allow(clippy::cast_possible_truncation)]
    let (src_w, src_h) = (src_w as u32, src_h as u32);

    if (src_w, src_h) == (width, height) {
        return Ok(tensor.clone());
    }

    let raw: Vec<f32> = tensor.iter().copied().collect();
    let source = Rgb32FImage::from_raw(src_w, src_h, raw).ok_or_else(|| Error::ShapeMismatch {
        expected: format!("{src_w}x{src_h}x{RGB_CHANNELS} buffer"),
        actual: format!("{} values", tensor.len()),
    })?;

    // Triangle weights are non-negative, so values stay within [0, 1]
    let resized = image::imageops::resize(&source, width, height, FilterType::Triangle);

    Array4::from_shape_vec(
        (1, height as usize, width as usize, RGB_CHANNELS),
        resized.into_raw(),
    )
    .map_err(|_| Error::ShapeMismatch {
        expected: format!("(1, {height}, {width}, {RGB_CHANNELS})"),
        actual: "reshape failed".to_string(),
    })
}

/// Resize a style tensor to the fixed size the model was trained with.
///
/// # Errors
///
/// Returns an error if the tensor is not a single RGB image.
pub fn resize_style(tensor: &ImageTensor) -> Result<ImageTensor> {
    resize_tensor(tensor, STYLE_IMAGE_SIZE, STYLE_IMAGE_SIZE)
}
