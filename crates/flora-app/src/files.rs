//! Local file loading for headless front ends.

use std::path::Path;

use flora_core::PickedFile;

use crate::AppError;

/// Reads `path` into a [`PickedFile`], guessing the media type from the
/// extension.
///
/// Unknown extensions get `application/octet-stream`, which the staging flow
/// then ignores as a non-image.
///
/// # Errors
/// Returns [`AppError::Io`] when the file cannot be read.
pub async fn load_picked_file(path: &Path) -> Result<PickedFile, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    Ok(PickedFile::new(name, media_type, bytes))
}
