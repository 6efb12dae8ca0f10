//! Debug preview export for inspecting the merged canvas

use std::path::Path;

use tracing::info;

use crate::algorithm::blend::{blend, to_preview_image};
use crate::algorithm::compositor::Canvas;
use crate::io::error::{AlignError, Result, WithPath};

/// Blend all channels and save the preview as a grayscale PNG
///
/// # Errors
///
/// Returns an error if:
/// - The canvas is empty and cannot be encoded
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_preview(canvas: &Canvas, output_path: &Path) -> Result<()> {
    let image = to_preview_image(&blend(canvas), canvas.kind());

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    image
        .save(output_path)
        .map_err(|e| AlignError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    info!(path = %output_path.display(), "Wrote blended preview");
    Ok(())
}
