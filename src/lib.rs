//! # `neural-style`
//!
//! A library for applying a pretrained neural style-transfer model to a
//! content image and a style image.
//!
//! The model itself is an opaque artifact behind the [`StyleModel`] and
//! [`ModelLoader`] traits. [`OnnxLoader`] loads ONNX exports with ONNX Runtime.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use neural_style::{transfer_style, OnnxLoader};
//!
//! # fn main() -> neural_style::Result<()> {
//! let stylized = transfer_style(
//!     Path::new("content.jpg"),
//!     Path::new("style.png"),
//!     Path::new("model"),
//!     &OnnxLoader::new(),
//! )?;
//!
//! neural_style::image::save_image(&stylized, "stylized.jpeg", 95)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod model;
pub mod pipeline;

pub use error::{Error, Result, Stage};
pub use model::{ModelLoader, OnnxLoader, StyleModel};
pub use pipeline::{transfer_style, Config, Pipeline};
