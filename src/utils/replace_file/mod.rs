use std::path::Path;

use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

/// Replaces the contents of an existing file with the provided text.
///
/// The file is opened for writing, truncated, written in full and synced. It is never
/// created: a theme file that disappeared between two operations is reported instead of
/// silently recreated.
///
/// # Errors
///
/// Raises a general document error of kind `FileWriteFailed` when the file cannot be
/// opened, written or synced.
pub async fn replace_file(file_path: &Path, replacement_context: &str) -> VcThemeResult<()> {
    tracing::debug!(
        "Replacing {:?} with {} bytes",
        file_path,
        replacement_context.len()
    );

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(file_path)
        .await
        .map_err(|err| {
            VcThemeError::raise_general_document_error(
                ErrorKind::FileWriteFailed,
                &format!("Could not open {:?} for writing: {}", file_path, err),
                ErrorAction::Notify,
            )
        })?;

    file.write_all(replacement_context.as_bytes())
        .await
        .map_err(|err| {
            VcThemeError::raise_general_document_error(
                ErrorKind::FileWriteFailed,
                &format!("Could not write {:?}: {}", file_path, err),
                ErrorAction::Notify,
            )
        })?;

    file.sync_all().await.map_err(|err| {
        VcThemeError::raise_general_document_error(
            ErrorKind::FileWriteFailed,
            &err.to_string(),
            ErrorAction::Notify,
        )
    })?;

    Ok(())
}
