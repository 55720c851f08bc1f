//! ONNX Runtime implementation of [`StyleModel`].

use std::path::{Path, PathBuf};

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::ImageTensor;

use super::{ModelLoader, StyleModel};

/// File looked up inside a model directory.
pub const DEFAULT_MODEL_FILENAME: &str = "model.onnx";

/// Loads style-transfer models exported to ONNX.
///
/// The path may point at the `.onnx` file itself or at a directory
/// containing [`DEFAULT_MODEL_FILENAME`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl OnnxLoader {
    /// Create a new loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve the model file for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] if neither the path nor the
    /// directory's model file exists.
    pub fn resolve(path: &Path) -> Result<PathBuf> {
        let file = if path.is_dir() {
            path.join(DEFAULT_MODEL_FILENAME)
        } else {
            path.to_path_buf()
        };

        if file.is_file() {
            Ok(file)
        } else {
            Err(Error::ModelNotFound { path: file })
        }
    }
}

impl ModelLoader for OnnxLoader {
    type Model = OnnxStyleModel;

    fn load(&self, path: &Path) -> Result<Self::Model> {
        let file = Self::resolve(path)?;

        tracing::debug!("Creating ONNX session from {}", file.display());

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(&file))
            .map_err(|source| Error::ModelLoad {
                path: file.clone(),
                source,
            })?;

        if session.inputs.len() < 2 {
            return Err(Error::IncompatibleModel {
                path: file,
                reason: format!(
                    "expected content and style inputs, found {} input(s)",
                    session.inputs.len()
                ),
            });
        }

        Ok(OnnxStyleModel { session })
    }
}

/// A loaded ONNX style-transfer session.
pub struct OnnxStyleModel {
    session: Session,
}

impl StyleModel for OnnxStyleModel {
    fn stylize(&mut self, content: &ImageTensor, style: &ImageTensor) -> Result<Vec<Array4<f32>>> {
        let content_value =
            Tensor::from_array(content.clone()).map_err(|source| Error::Inference { source })?;
        let style_value =
            Tensor::from_array(style.clone()).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![content_value, style_value])
            .map_err(|source| Error::Inference { source })?;

        let mut values = outputs.values();
        let first = values.next().ok_or(Error::EmptyOutput)?;

        // Only the stylized image is required; auxiliary outputs that are
        // not 4D f32 tensors are dropped
        let mut tensors = vec![extract_array4(&first)?];
        tensors.extend(values.filter_map(|output| extract_array4(&output).ok()));

        Ok(tensors)
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Inference { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
