//! Pretrained style-transfer model interface and the ONNX Runtime backend.

mod onnx;

pub use onnx::{OnnxLoader, OnnxStyleModel, DEFAULT_MODEL_FILENAME};

use std::path::Path;

use ndarray::Array4;

use crate::error::Result;
use crate::image::ImageTensor;

/// A pretrained transformation taking a content and a style tensor.
///
/// Both inputs are NHWC tensors with values in [0, 1]. The returned
/// collection is ordered; the stylized image is the first element.
pub trait StyleModel {
    /// Run the model on `(content, style)`.
    ///
    /// # Errors
    ///
    /// Returns an invocation-stage error if the model rejects the inputs
    /// or produces outputs that are not 4-D float tensors.
    fn stylize(&mut self, content: &ImageTensor, style: &ImageTensor) -> Result<Vec<Array4<f32>>>;
}

/// Loads a [`StyleModel`] from a filesystem path.
pub trait ModelLoader {
    type Model: StyleModel;

    /// Load the model artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns a model-load-stage error if the path is missing or the
    /// artifact is corrupt or incompatible.
    fn load(&self, path: &Path) -> Result<Self::Model>;
}

impl<M: StyleModel + ?Sized> StyleModel for Box<M> {
    fn stylize(&mut self, content: &ImageTensor, style: &ImageTensor) -> Result<Vec<Array4<f32>>> {
        (**self).stylize(content, style)
    }
}
