//! Positional arguments: sheet files and directories of sheets.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Could not find file or directory '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to list '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Turn the positional arguments into the list of files to process.
///
/// Files are kept as given. A directory contributes its immediate files,
/// sorted by name; subdirectories are not entered. Each path appears once,
/// at its first position.
pub fn expand_paths<S: AsRef<str>>(args: &[S]) -> Result<Vec<PathBuf>, InputError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for arg in args {
        let path = Path::new(arg.as_ref());
        if path.is_dir() {
            for file in directory_files(path)? {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        } else if path.exists() {
            if seen.insert(path.to_path_buf()) {
                files.push(path.to_path_buf());
            }
        } else {
            return Err(InputError::NotFound(path.to_path_buf()));
        }
    }

    log::debug!("Resolved {} input files", files.len());
    Ok(files)
}

fn directory_files(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let read_dir_error = |source| InputError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
