//! Path classification

use std::fs;
use std::path::Path;

use crate::types::PathKind;

/// Classify what currently lives at `path`
///
/// Follows symlinks like `stat`. Anything that cannot be stat'ed, and any
/// node that is neither a regular file nor a directory, is `Missing`.
pub fn classify(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => PathKind::File,
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(_) | Err(_) => PathKind::Missing,
    }
}
