//! CLI interaction module
//!
//! This module provides the `CliAdapter` implementation of the `InteractionAdapter` trait
//! for terminal-based operator prompts.

mod cli_adapter;

pub use cli_adapter::CliAdapter;
