//! Input format checks.

use std::path::Path;

use crate::error::{Error, Result};

/// File extensions the decoder handles reliably.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Reject paths whose extension is not a supported raster format.
///
/// The check is case-insensitive and runs before any decoding, so an
/// unsupported file never reaches the decoder.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if the extension is missing or unsupported.
pub fn validate_format(path: &Path) -> Result<()> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });

    if supported {
        Ok(())
    } else {
        Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            supported: SUPPORTED_EXTENSIONS.join(", "),
        })
    }
}
