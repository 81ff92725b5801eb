// Local tree enumeration for batch uploads
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Path of the file, rooted where the walk started.
    pub path: PathBuf,
    /// Base name of the file.
    pub filename: String,
}

impl FileDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, filename }
    }
}

/// Collect every file below `root`.
///
/// Directories are expanded with an explicit stack, so deep trees do not grow
/// the call stack. Entry order follows whatever the filesystem reports. A
/// `root` that is a file yields just that file.
pub fn walk(root: impl AsRef<Path>) -> io::Result<Vec<FileDescriptor>> {
    let root = root.as_ref();
    if fs::metadata(root)?.is_file() {
        return Ok(vec![FileDescriptor::new(root)]);
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if fs::metadata(&path)?.is_dir() {
                pending.push(path);
            } else {
                files.push(FileDescriptor::new(path));
            }
        }
    }
    log::debug!("walked {} file(s) under {}", files.len(), root.display());
    Ok(files)
}
