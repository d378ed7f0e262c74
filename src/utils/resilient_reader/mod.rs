use std::path::Path;
use tracing::error;

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

/// Reads a file that another program may be rewriting right now.
///
/// Editors truncate before writing, so a watcher event can observe an empty file for a few
/// milliseconds. Empty reads are retried for a short while before giving up.
pub async fn resilient_reader(path: &Path) -> VcThemeResult<String> {
    let mut attempts = 0;
    let retries = 20;

    while attempts <= retries {
        let raw_content = tokio::fs::read_to_string(path).await.map_err(|err| {
            VcThemeError::raise_general_document_error(
                ErrorKind::FileReadFailed,
                &format!("Could not read {:?}: {}", path, err),
                ErrorAction::Notify,
            )
        })?;

        if !raw_content.is_empty() {
            return Ok(raw_content);
        }

        attempts += 1;
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let error_message = format!(
        "Exceeded maximum attempts to read `{}`. The file stayed empty.",
        path.to_string_lossy()
    );

    error!("{}", error_message);

    Err(VcThemeError::raise_general_document_error(
        ErrorKind::FileReadMaxRetriesExceeded,
        &error_message,
        ErrorAction::Notify,
    ))
}
