//! Image loading, tensor conversion, and saving utilities.

mod format;
mod load;
mod save;
mod tensor;

pub use format::{validate_format, SUPPORTED_EXTENSIONS};
pub use load::{image_to_tensor, load_image};
pub use save::save_image;
pub use tensor::{add_batch_dim, resize_style, resize_tensor, strip_batch_dim};

use ndarray::{Array3, Array4};

/// Image tensor in NHWC format (batch, height, width, channels).
/// Values are normalized to [0, 1].
pub type ImageTensor = Array4<f32>;

/// Stylized image in HWC format (height, width, channels).
pub type StyledImage = Array3<f32>;

/// Side length the style image is resized to before invocation.
pub const STYLE_IMAGE_SIZE: u32 = 256;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;
