//! Neural style transfer pipeline.

mod transfer;

pub use transfer::{postprocess, preprocess, transfer_style, Config, Pipeline, Preprocessed};
