//! Conflict resolution
//!
//! When a destination name is already taken, [`resolve_destination`] loops
//! until it finds a path that is either free or explicitly accepted for
//! overwrite. Where answers come from is abstracted behind
//! [`ConflictResolver`]: [`PromptResolver`] asks the operator using the
//! terminal protocol, [`PolicyResolver`] answers from a fixed policy.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::SafeCpError;
use crate::interaction::{InteractionAdapter, InteractionResult};
use crate::resolver::join_destination;
use crate::types::{Conflict, Decision, PathKind, Resolution};

/// Source of answers for destination conflicts
pub trait ConflictResolver {
    /// Decide what to do about an occupied destination
    ///
    /// Only called for type clashes, and for same-type clashes while
    /// overwrite prompting is enabled.
    fn resolve_conflict(&mut self, conflict: &Conflict) -> InteractionResult<Decision>;

    /// Confirm creating a missing destination directory tree
    fn confirm_create(&mut self, path: &Path) -> InteractionResult<bool>;
}

impl<T: ConflictResolver + ?Sized> ConflictResolver for &mut T {
    fn resolve_conflict(&mut self, conflict: &Conflict) -> InteractionResult<Decision> {
        (**self).resolve_conflict(conflict)
    }

    fn confirm_create(&mut self, path: &Path) -> InteractionResult<bool> {
        (**self).confirm_create(path)
    }
}

/// How conflicts are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Ask the operator
    #[default]
    Ask,
    /// Overwrite same-type conflicts without asking
    Overwrite,
    /// Leave every conflicting destination alone
    Skip,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Ask => "ask",
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ask" => Ok(ConflictPolicy::Ask),
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            "skip" => Ok(ConflictPolicy::Skip),
            other => Err(format!(
                "invalid conflict policy '{}' (expected ask, overwrite, or skip)",
                other
            )),
        }
    }
}

/// Non-interactive resolver answering from a fixed policy
///
/// Type clashes cannot be overwritten, so under `Overwrite` they surface as
/// a `TypeClash` failure for that task.
#[derive(Debug, Clone, Copy)]
pub struct PolicyResolver {
    policy: ConflictPolicy,
}

impl PolicyResolver {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }
}

impl ConflictResolver for PolicyResolver {
    fn resolve_conflict(&mut self, _conflict: &Conflict) -> InteractionResult<Decision> {
        Ok(match self.policy {
            ConflictPolicy::Overwrite => Decision::Overwrite,
            ConflictPolicy::Ask | ConflictPolicy::Skip => Decision::Skip,
        })
    }

    fn confirm_create(&mut self, _path: &Path) -> InteractionResult<bool> {
        Ok(true)
    }
}

/// Interactive resolver speaking the terminal prompt protocol
pub struct PromptResolver<A> {
    adapter: A,
}

impl<A: InteractionAdapter> PromptResolver<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// The adapter, for printing diagnostics on the same conversation
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    /// Read a name `validate_name` accepts, re-prompting until one arrives
    fn read_name(&self, prompt: &str) -> InteractionResult<String> {
        let mut name = self.adapter.ask_line(prompt)?;
        loop {
            if name.is_empty() {
                name = self
                    .adapter
                    .ask_line("Name cannot be empty. Please enter a new name: ")?;
            } else if name.contains('/') {
                name = self
                    .adapter
                    .ask_line("Name cannot contain '/'. Please enter a new name: ")?;
            } else if name == "." || name == ".." {
                name = self
                    .adapter
                    .ask_line("Name cannot be '.' or '..'. Please enter a new name: ")?;
            } else {
                return Ok(name);
            }
        }
    }

    /// First non-whitespace character of an answer, lowercased
    fn read_char(&self, prompt: &str) -> InteractionResult<Option<char>> {
        let line = self.adapter.ask_line(prompt)?;
        Ok(line
            .chars()
            .find(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase()))
    }
}

impl<A: InteractionAdapter> ConflictResolver for PromptResolver<A> {
    fn resolve_conflict(&mut self, conflict: &Conflict) -> InteractionResult<Decision> {
        let destination = conflict.destination.display();
        let source = conflict.source.display();

        if conflict.is_type_clash() {
            let prompt = format!(
                "Destination {} is a {}.\nCannot overwrite a {} with a {}.\nEnter new name for {}: ",
                destination, conflict.existing, conflict.existing, conflict.incoming, source
            );
            return self.read_name(&prompt).map(Decision::Rename);
        }

        let prompt = format!(
            "Destination {} already exists.\nDo you want to overwrite it by {} ? (y/n): ",
            destination, source
        );
        loop {
            match self.read_char(&prompt)? {
                Some('y') => return Ok(Decision::Overwrite),
                Some('n') => {
                    let name = self.read_name(&format!("Enter new name for {}: ", source))?;
                    return Ok(Decision::Rename(name));
                }
                _ => self
                    .adapter
                    .print_info("Invalid response. Please enter 'y' or 'n'."),
            }
        }
    }

    fn confirm_create(&mut self, path: &Path) -> InteractionResult<bool> {
        let prompt = format!(
            "Destination directory {} does not exist.\nWant to create it (y/n)? : ",
            path.display()
        );
        Ok(self.read_char(&prompt)? == Some('y'))
    }
}

/// Reject names that would escape the destination directory
pub fn validate_name(name: &str) -> Result<(), SafeCpError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(SafeCpError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Find the final destination for `source` inside `destination_dir`
///
/// Re-classifies after every rename, since the new name may collide too.
pub fn resolve_destination<R: ConflictResolver + ?Sized>(
    resolver: &mut R,
    destination_dir: &Path,
    target_name: impl AsRef<OsStr>,
    source: &Path,
    incoming: PathKind,
    overwrite_enabled: bool,
) -> Result<Resolution, SafeCpError> {
    let mut destination = join_destination(destination_dir, target_name);

    loop {
        let existing = classify(&destination);
        if !existing.exists() {
            return Ok(Resolution::Fresh(destination));
        }

        let conflict = Conflict {
            destination,
            source: source.to_path_buf(),
            existing,
            incoming,
        };

        if !conflict.is_type_clash() && !overwrite_enabled {
            debug!(
                path = %conflict.destination.display(),
                "destination exists, prompting disabled for this subtree"
            );
            return Ok(Resolution::Inherited(conflict.destination));
        }

        match resolver.resolve_conflict(&conflict)? {
            Decision::Overwrite if conflict.is_type_clash() => {
                warn!(path = %conflict.destination.display(), "overwrite refused on type clash");
                return Err(SafeCpError::TypeClash {
                    path: conflict.destination,
                    existing: existing.as_str(),
                    incoming: incoming.as_str(),
                });
            }
            Decision::Overwrite => {
                debug!(path = %conflict.destination.display(), "overwrite confirmed");
                return Ok(Resolution::Overwrite(conflict.destination));
            }
            Decision::Rename(name) => {
                validate_name(&name)?;
                debug!(from = %conflict.destination.display(), to = %name, "renamed");
                destination = join_destination(destination_dir, &name);
            }
            Decision::Skip => {
                debug!(path = %conflict.destination.display(), "skipped");
                return Ok(Resolution::Skipped);
            }
        }
    }
}
