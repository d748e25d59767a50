use anyhow::Context;
use rotspec_core::domain::{CoreResult, RotspecError};
use std::fs;
use std::path::Path;

/// Decode a single-channel intensity grid from a JSON matrix.
pub(super) fn read_image_grid(path: &Path) -> CoreResult<Vec<Vec<f64>>> {
    let source = fs::read_to_string(path).map_err(|source| {
        RotspecError::io_system(
            "IO.IMAGE_READ",
            format!("failed to read image '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        RotspecError::input_validation(
            "INPUT.IMAGE_PARSE",
            format!("failed to parse image '{}': {}", path.display(), source),
        )
    })
}

/// Write a text artifact, creating parent directories on the way.
pub(super) fn write_text_artifact(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write '{}'", path.display()))
}
