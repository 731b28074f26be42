//! File discovery for finding images in the source folder.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name suffixes accepted as photographs (compared case-insensitively).
pub const SUPPORTED_SUFFIXES: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".bmp"];

/// A file in the source folder that looks like a photograph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Full path to the file
    pub path: PathBuf,
    /// File name, the sort key; lossy when the name is not UTF-8
    pub file_name: String,
}

/// Lists image candidates in a single folder.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDiscovery;

impl FileDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// Regular files directly inside `dir` with a supported extension, sorted
    /// ascending by file name.
    ///
    /// Subfolders are not searched.
    pub fn discover(&self, dir: &Path) -> std::io::Result<Vec<ImageCandidate>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let message = e.to_string();
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, message))
            })?;
            if !entry.file_type().is_file() || !Self::is_supported(entry.path()) {
                continue;
            }
            files.push(ImageCandidate {
                path: entry.path().to_path_buf(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
            });
        }

        // Byte-wise name order keeps placement deterministic.
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        tracing::debug!("Discovered {} image(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file name ends with a supported suffix.
    ///
    /// A bare `.png` counts, as does a name that is not valid UTF-8.
    pub fn is_supported(path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_ascii_lowercase();
        SUPPORTED_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}
