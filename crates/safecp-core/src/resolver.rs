//! Source argument decoding
//!
//! A source is given as `path` or `path:newname`. The colon only acts as a
//! rename delimiter when it sits in the final path segment and something
//! follows it; a path that already exists verbatim is never split.

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::types::SourceSpec;

/// Process-level path facts captured once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Directory relative arguments are resolved against
    pub cwd: PathBuf,
}

impl PathContext {
    /// Create a context rooted at `cwd`
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Capture the process working directory
    pub fn current() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Anchor a relative path at the working directory
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// `/path/to/anything/` => `/path/to/anything`; the root stays `/`
pub fn strip_trailing_slash(raw: &str) -> &str {
    if raw.len() > 1 && raw.ends_with('/') {
        &raw[..raw.len() - 1]
    } else {
        raw
    }
}

/// Split `path:newname` when the colon delimits a rename
///
/// Returns `None` when there is no colon, when the colon belongs to an
/// earlier path segment, or when what follows it is not a usable name
/// (empty, `.` or `..`). The colon is then part of the path.
pub fn split_rename(raw: &str) -> Option<(&str, &str)> {
    let colon = raw.rfind(':')?;
    if raw.rfind('/').is_some_and(|slash| slash > colon) {
        return None;
    }
    let (path, name) = (&raw[..colon], &raw[colon + 1..]);
    // `.` and `..` would point outside the destination directory
    if path.is_empty() || name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some((path, name))
}

/// Remove `.` and `..` components without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Final path segment as an owned string (empty for `/`)
pub fn final_segment(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn canonical_or_absolute(path: &Path, ctx: &PathContext) -> PathBuf {
    let absolute = ctx.absolute(path);
    fs::canonicalize(&absolute).unwrap_or_else(|_| normalize_lexically(&absolute))
}

/// Decode one source argument into a canonical path and a target name
pub fn resolve_source(raw: &str, ctx: &PathContext) -> SourceSpec {
    let trimmed = strip_trailing_slash(raw);

    // An existing path is taken literally, colons and all
    if let Ok(canonical) = fs::canonicalize(ctx.absolute(Path::new(trimmed))) {
        debug!(raw, path = %canonical.display(), "source resolved");
        return SourceSpec {
            raw: raw.to_string(),
            target_name: final_segment(&canonical),
            canonical_path: canonical,
        };
    }

    if let Some((path, name)) = split_rename(trimmed) {
        let canonical_path = canonical_or_absolute(Path::new(path), ctx);
        debug!(raw, path = %canonical_path.display(), name, "source resolved with rename");
        return SourceSpec {
            raw: raw.to_string(),
            canonical_path,
            target_name: name.to_string(),
        };
    }

    // Missing source: keep the raw text so classification reports it cleanly
    let target_name = match trimmed.rfind('/') {
        Some(slash) => trimmed[slash + 1..].to_string(),
        None => trimmed.to_string(),
    };
    SourceSpec {
        raw: raw.to_string(),
        canonical_path: normalize_lexically(&ctx.absolute(Path::new(trimmed))),
        target_name,
    }
}

/// Normalise the destination argument to an absolute path with no trailing slash
pub fn destination_root(raw: &str, ctx: &PathContext) -> PathBuf {
    normalize_lexically(&ctx.absolute(Path::new(strip_trailing_slash(raw))))
}

/// `destination_dir/target_name`
///
/// Target names never contain `/` (listing entries cannot, rename answers
/// are validated), so the join cannot produce `//` or a trailing slash.
pub fn join_destination(destination_dir: &Path, target_name: impl AsRef<OsStr>) -> PathBuf {
    destination_dir.join(target_name.as_ref())
}
