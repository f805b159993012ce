//! Core data types for safecp

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a filesystem path currently holds
///
/// Derived on demand and never cached: the filesystem can change between
/// two calls (for instance after a directory has been created).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Nonexistent, inaccessible, or a node type safecp does not copy
    Missing,
}

impl PathKind {
    /// Human-readable noun used in prompts and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Directory => "directory",
            PathKind::Missing => "missing path",
        }
    }

    /// Whether something occupies the path
    pub fn exists(&self) -> bool {
        !matches!(self, PathKind::Missing)
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded source argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// The argument as given by the user
    pub raw: String,
    /// Absolute path without a trailing slash
    pub canonical_path: PathBuf,
    /// Name to use at the destination
    pub target_name: String,
}

/// One unit of copy work, scoped to a single recursion frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    /// Entry name at the destination; directory listings may not be UTF-8
    pub target_name: OsString,
    /// Whether same-type collisions may prompt for overwrite
    pub overwrite_enabled: bool,
}

impl CopyTask {
    /// Top-level task for a resolved source; prompting starts enabled
    pub fn top_level(spec: &SourceSpec, destination_dir: &Path) -> Self {
        Self {
            source: spec.canonical_path.clone(),
            destination_dir: destination_dir.to_path_buf(),
            target_name: OsString::from(&spec.target_name),
            overwrite_enabled: true,
        }
    }
}

/// A destination already occupied when a copy is about to write there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Full destination path currently being considered
    pub destination: PathBuf,
    /// Source path being copied
    pub source: PathBuf,
    /// What already occupies the destination
    pub existing: PathKind,
    /// What is about to be written
    pub incoming: PathKind,
}

impl Conflict {
    /// A file against a directory (or the reverse) can only be renamed
    pub fn is_type_clash(&self) -> bool {
        self.existing != self.incoming
    }
}

/// Answer to a conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Write over the existing node
    Overwrite,
    /// Retry under a different name in the same directory
    Rename(String),
    /// Leave the destination alone and drop the task
    Skip,
}

/// Final destination chosen by the conflict loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was at the destination
    Fresh(PathBuf),
    /// The operator accepted overwriting an existing node
    Overwrite(PathBuf),
    /// A same-type node exists and prompting is disabled for this subtree
    Inherited(PathBuf),
    /// The task was dropped
    Skipped,
}

impl Resolution {
    /// Destination path, unless the task was skipped
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Fresh(p) | Resolution::Overwrite(p) | Resolution::Inherited(p) => {
                Some(p)
            }
            Resolution::Skipped => None,
        }
    }

    /// Overwrite policy handed to the children of a directory resolved this way
    ///
    /// Only an explicitly confirmed overwrite keeps prompting alive below it.
    /// A fresh (or freshly renamed) directory has nothing to conflict with,
    /// and an inherited resolution was already running with prompting off.
    pub fn propagated_overwrite(&self) -> bool {
        matches!(self, Resolution::Overwrite(_))
    }
}

/// A task that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Path the failure is about
    pub path: PathBuf,
    /// Error code (e.g., "E002")
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Counters for one run across all top-level sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Files fully written
    pub files_copied: usize,
    /// Bytes written to destination files
    pub bytes_copied: u64,
    /// Directories newly created
    pub dirs_created: usize,
    /// Existing directories copied into
    pub dirs_merged: usize,
    /// Tasks dropped by a skip decision
    pub skipped: usize,
    /// Tasks that failed or were refused
    pub failures: Vec<TaskFailure>,
}

impl CopyReport {
    /// Whether every task completed or was deliberately skipped
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary for the end of a run
    pub fn summary(&self) -> String {
        format!(
            "{} file(s) copied ({} bytes), {} director{} created, {} merged, {} skipped, {} failed",
            self.files_copied,
            self.bytes_copied,
            self.dirs_created,
            if self.dirs_created == 1 { "y" } else { "ies" },
            self.dirs_merged,
            self.skipped,
            self.failures.len()
        )
    }
}
