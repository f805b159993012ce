//! Error types for safecp operations

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for safecp operations
#[derive(Error, Debug)]
pub enum SafeCpError {
    // === Source errors (E001-E003) ===
    /// E001: Source no longer classifies as a file or directory
    #[error("E001: Can't find Source {}. Skipping.", path.display())]
    SourceMissing { path: PathBuf },

    /// E002: Source could not be opened for reading or listing
    #[error("E002: Failed to open source {}: {source}", path.display())]
    OpenSource {
        path: PathBuf,
        source: std::io::Error,
    },

    /// E003: Reading from the source failed mid-copy
    #[error("E003: Failed to read from source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Destination errors (E004-E005) ===
    /// E004: Destination file could not be created or truncated
    #[error("E004: Failed to open/create destination file {}: {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        source: std::io::Error,
    },

    /// E005: Writing to the destination failed; a partial file remains
    #[error("E005: Failed to write to destination file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Structural refusals (E006-E008, E017) ===
    /// E006: Copying the root directory is refused
    #[error("E006: Cannot copy root directory (/). Skipping copy.")]
    RootCopy,

    /// E007: Source directory equals the destination directory
    #[error("E007: Source and destination paths are the same ({}). Skipping copy.", path.display())]
    SameDirectory { path: PathBuf },

    /// E008: Destination lies inside the source directory
    #[error(
        "E008: Cannot copy parent directory ({}) into its child ({}). Skipping copy.",
        source_dir.display(),
        destination.display()
    )]
    CopyIntoDescendant {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    /// E017: A file would be copied onto itself
    #[error("E017: Source and destination are the same file ({}). Skipping copy.", path.display())]
    SameFile { path: PathBuf },

    // === Directory building errors (E009-E011) ===
    /// E009: A directory segment could not be created
    #[error("E009: Failed to create destination directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// E010: A file occupies the path that should become a directory
    #[error("E010: Path {} is a file, choose a different path.", path.display())]
    DestinationIsFile { path: PathBuf },

    /// E011: The operator declined to create a missing directory
    #[error("E011: Directory creation aborted: {}", path.display())]
    CreationDeclined { path: PathBuf },

    // === Conflict resolution errors (E012-E014) ===
    /// E012: A node of one kind cannot replace a node of another kind
    #[error("E012: Cannot overwrite {} with {}: {}", existing, incoming, path.display())]
    TypeClash {
        path: PathBuf,
        existing: &'static str,
        incoming: &'static str,
    },

    /// E013: A rename answer is not a usable file name
    #[error("E013: Invalid name {name:?}: names must be non-empty, without '/', and not '.' or '..'")]
    InvalidName { name: String },

    /// E014: The operator could not be asked
    #[error("E014: Interaction failed: {0}")]
    Interaction(#[from] crate::interaction::InteractionError),

    // === Setup errors ===
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SafeCpError {
    /// Get the error code (e.g., "E001", "E002")
    pub fn code(&self) -> &'static str {
        match self {
            SafeCpError::SourceMissing { .. } => "E001",
            SafeCpError::OpenSource { .. } => "E002",
            SafeCpError::Read { .. } => "E003",
            SafeCpError::CreateDestination { .. } => "E004",
            SafeCpError::Write { .. } => "E005",
            SafeCpError::RootCopy => "E006",
            SafeCpError::SameDirectory { .. } => "E007",
            SafeCpError::CopyIntoDescendant { .. } => "E008",
            SafeCpError::SameFile { .. } => "E017",
            SafeCpError::DirectoryCreation { .. } => "E009",
            SafeCpError::DestinationIsFile { .. } => "E010",
            SafeCpError::CreationDeclined { .. } => "E011",
            SafeCpError::TypeClash { .. } => "E012",
            SafeCpError::InvalidName { .. } => "E013",
            SafeCpError::Interaction(_) => "E014",
            SafeCpError::Config(_) => "E015",
            SafeCpError::Io(_) => "E016",
        }
    }

    /// Whether the task was refused before touching the filesystem
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            SafeCpError::RootCopy
                | SafeCpError::SameDirectory { .. }
                | SafeCpError::CopyIntoDescendant { .. }
                | SafeCpError::SameFile { .. }
        )
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            // Per-task failures: the run continues and finishes with 1
            SafeCpError::SourceMissing { .. }
            | SafeCpError::OpenSource { .. }
            | SafeCpError::Read { .. }
            | SafeCpError::CreateDestination { .. }
            | SafeCpError::Write { .. }
            | SafeCpError::RootCopy
            | SafeCpError::SameDirectory { .. }
            | SafeCpError::CopyIntoDescendant { .. }
            | SafeCpError::SameFile { .. }
            | SafeCpError::DirectoryCreation { .. }
            | SafeCpError::TypeClash { .. }
            | SafeCpError::InvalidName { .. }
            | SafeCpError::Interaction(_) => 1,

            // Setup failures stop the run before copying starts
            SafeCpError::DestinationIsFile { .. }
            | SafeCpError::CreationDeclined { .. }
            | SafeCpError::Config(_)
            | SafeCpError::Io(_) => 2,
        }
    }
}
