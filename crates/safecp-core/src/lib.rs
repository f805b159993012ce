//! safecp-core: Core library for conflict-aware recursive copying
//!
//! This crate provides path decoding, conflict resolution, and the copy
//! engine behind the `safecp` command.

/// Core error types for safecp operations
pub mod error;

/// Configuration handling
pub mod config;

/// Core data types (PathKind, CopyTask, Resolution, etc.)
pub mod types;

/// Filesystem node classification
pub mod classify;

/// Source argument decoding
pub mod resolver;

/// Operator interaction capability
pub mod interaction;

/// Conflict resolution loop and resolvers
pub mod conflict;

/// Destination directory creation
pub mod builder;

/// Recursive copy engine
pub mod engine;

// Re-exports for convenience
pub use builder::{ensure_path, make_dir};
pub use classify::classify;
pub use config::{Config, SafeCpConfig, load_config};
pub use conflict::{
    ConflictPolicy, ConflictResolver, PolicyResolver, PromptResolver, resolve_destination,
};
pub use engine::{CopyEngine, CopyOptions};
pub use error::SafeCpError;
pub use interaction::{InteractionAdapter, InteractionError, InteractionResult, LineAdapter};
pub use resolver::{PathContext, destination_root, resolve_source};
pub use types::{
    Conflict, CopyReport, CopyTask, Decision, PathKind, Resolution, SourceSpec, TaskFailure,
};
