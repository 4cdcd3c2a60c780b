use crate::error::ReadtimeError;
use crate::format::SupportedFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Resolve the input path to the list of documents to measure.
///
/// A file must itself be a supported format. A directory contributes its
/// immediate supported entries, sorted by name; anything else inside it is
/// skipped. An empty list means there is nothing to report.
pub fn scan(path: &Path) -> Result<Vec<PathBuf>, ReadtimeError> {
    let metadata = fs::metadata(path).map_err(|source| ReadtimeError::PathNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return match SupportedFormat::from_path(path) {
            Some(_) => Ok(vec![path.to_path_buf()]),
            None => Err(ReadtimeError::UnsupportedInput {
                path: path.to_path_buf(),
                supported: SupportedFormat::supported_list(),
            }),
        };
    }

    let entries = fs::read_dir(path).map_err(|source| ReadtimeError::PathNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let entry_path = entry.path();
        // follows symlinks so linked documents are included
        let is_file = fs::metadata(&entry_path)
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file && SupportedFormat::from_path(&entry_path).is_some() {
            files.push(entry_path);
        } else {
            trace!("Skipping {}", entry_path.display());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} documents in {}", files.len(), path.display());
    Ok(files)
}
