//! Moving placed source files out of the way.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Move `from` into `dir`, keeping its file name. Falls back to copy and
/// delete when a rename is not possible (e.g. across filesystems).
pub fn move_into(from: &Path, dir: &Path) -> Result<PathBuf, PipelineError> {
    let file_name = from.file_name().ok_or_else(|| PipelineError::Move {
        from: from.to_path_buf(),
        to: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let to = dir.join(file_name);
    let move_error = |source: std::io::Error| PipelineError::Move {
        from: from.to_path_buf(),
        to: to.clone(),
        source,
    };

    if let Err(rename_err) = std::fs::rename(from, &to) {
        tracing::debug!("Rename failed ({}), copying {:?} instead", rename_err, from);
        std::fs::copy(from, &to).map_err(move_error)?;
        std::fs::remove_file(from).map_err(move_error)?;
    }
    Ok(to)
}
