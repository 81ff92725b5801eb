// Local path reconciliation and lazy directory materialization
use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR, Path};

/// Whether the last component carries an extension (`a.txt`, `a.`), as opposed to a bare directory name.
pub fn has_extension(path: &Path) -> bool {
    path.extension().is_some()
}

fn parent_dir(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(Path::new(".")),
        other => other,
    }
}

/// Check whether a path can be considered present on disk.
///
/// A path exists if it is on the filesystem, or if it names a file (has an
/// extension) whose parent directory already exists. The second rule lets
/// callers about to write a file treat its target as already materialized.
pub fn path_exists(path: &Path) -> bool {
    if path.exists() {
        return true;
    }
    has_extension(path) && parent_dir(path).is_some_and(Path::is_dir)
}

/// Make sure every directory level of `path` exists.
///
/// Missing ancestors are created one level at a time from the top down.
/// Levels with an extension are treated as file targets and never created.
/// Concurrent creation of the same level is tolerated.
pub fn ensure_directories(path: &Path) -> io::Result<()> {
    let mut pending = Vec::new();
    let mut current = Some(path);
    while let Some(level) = current {
        if path_exists(level) {
            break;
        }
        pending.push(level);
        current = parent_dir(level);
    }

    while let Some(level) = pending.pop() {
        if has_extension(level) {
            continue;
        }
        match fs::create_dir(level) {
            Ok(()) => log::debug!("created directory {}", level.display()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn to_key_separators(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}

/// Derive the remote object key for a local file.
///
/// With a non-empty `prefix_to_strip`, the prefix (normalized to end with `/`)
/// is removed from the front of `local_path` and the remainder becomes the
/// relative key. Otherwise `filename` is used untouched. The result is always
/// `{custom_folder}/{relative}`, so an empty folder yields a leading `/`.
pub fn remote_key_for(
    local_path: &Path,
    filename: &str,
    prefix_to_strip: &str,
    custom_folder: &str,
) -> String {
    let relative = if prefix_to_strip.is_empty() {
        filename.to_string()
    } else {
        let prefix = ensure_trailing_slash(&to_key_separators(prefix_to_strip));
        let local = to_key_separators(&local_path.to_string_lossy());
        match local.strip_prefix(prefix.as_str()) {
            Some(rest) => rest.to_string(),
            None => local,
        }
    };
    format!("{custom_folder}/{relative}")
}

/// Return a new String that guarantees a trailing '/'.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Concatenate a base URL and a tail without doubling the separator.
pub fn join_url(base: &str, tail: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        tail.trim_start_matches('/')
    )
}
