//! Directory tree creation (`mkdir -p` with an optional confirmation)

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::classify::classify;
use crate::conflict::ConflictResolver;
use crate::error::SafeCpError;
use crate::types::PathKind;

/// Create a single directory, tolerating "already exists"
///
/// Returns whether the directory was newly created.
pub fn make_dir(path: &Path) -> Result<bool, SafeCpError> {
    match fs::create_dir(path) {
        Ok(()) => {
            trace!(path = %path.display(), "created directory");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(SafeCpError::DirectoryCreation {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Ensure the full directory path exists, creating missing segments in order
///
/// An existing directory succeeds immediately; an existing file fails. When
/// `interactive` is set the resolver is asked once before anything is made.
pub fn ensure_path<R: ConflictResolver + ?Sized>(
    path: &Path,
    interactive: bool,
    resolver: &mut R,
) -> Result<(), SafeCpError> {
    match classify(path) {
        PathKind::Directory => return Ok(()),
        PathKind::File => {
            return Err(SafeCpError::DestinationIsFile {
                path: path.to_path_buf(),
            });
        }
        PathKind::Missing => {}
    }

    if interactive && !resolver.confirm_create(path)? {
        return Err(SafeCpError::CreationDeclined {
            path: path.to_path_buf(),
        });
    }

    let mut prefix = PathBuf::new();
    for component in path.components() {
        prefix.push(component.as_os_str());
        if matches!(component, Component::Normal(_)) {
            make_dir(&prefix)?;
        }
    }

    // A dangling symlink or special node reports "already exists" too
    if classify(path) != PathKind::Directory {
        return Err(SafeCpError::DirectoryCreation {
            path: path.to_path_buf(),
            source: std::io::Error::other("path exists but is not a directory"),
        });
    }

    debug!(path = %path.display(), "destination directory ready");
    Ok(())
}
