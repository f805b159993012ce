//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::Parser;

use safecp_core::ConflictPolicy;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// safecp - Copy files and directories without silently clobbering anything
#[derive(Parser, Debug)]
#[command(name = "safecp")]
#[command(version = VERSION)]
#[command(about = "Copy files and directories, asking before anything is overwritten")]
#[command(long_about = "Copy files and directories into a destination directory, asking before anything is overwritten.\n\nEach source may be written as path:newname to copy it under a different name.\nWhen a destination already exists you are asked to overwrite it or choose a new name.\nA file never replaces a directory (or the reverse); a new name is always required.\n\nExamples:\n  safecp -s photo.jpg -d backup/\n  safecp -s ./old.txt:new.txt docs -d /mnt/usb")]
pub struct Cli {
    /// Source files or directories (path or path:newname)
    #[arg(short, long = "source", value_name = "SOURCE", num_args = 1.., required = true)]
    pub sources: Vec<String>,

    /// Destination directory (created if missing)
    #[arg(short, long, value_name = "DESTINATION")]
    pub destination: String,

    /// Increase log verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Create a missing destination without asking
    #[arg(short, long)]
    pub yes: bool,

    /// How to answer destination conflicts (ask, overwrite, skip)
    #[arg(long, value_name = "POLICY")]
    pub on_conflict: Option<ConflictPolicy>,

    /// Configuration file to use instead of the default lookup
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give new files the configured file mode instead of the source's
    #[arg(long)]
    pub no_preserve_mode: bool,
}

/// Parse command line arguments
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_multiple_sources() {
        let cli = Cli::try_parse_from(["safecp", "-s", "a.txt", "b:c", "-d", "out/"]).unwrap();
        assert_eq!(cli.sources, vec!["a.txt", "b:c"]);
        assert_eq!(cli.destination, "out/");
        assert!(cli.on_conflict.is_none());
        assert!(!cli.yes);
    }

    #[test]
    fn test_repeated_source_flag() {
        let cli = Cli::try_parse_from(["safecp", "-s", "a", "-s", "b", "-d", "out"]).unwrap();
        assert_eq!(cli.sources, vec!["a", "b"]);
    }

    #[test]
    fn test_on_conflict_policy() {
        let cli =
            Cli::try_parse_from(["safecp", "-s", "a", "-d", "o", "--on-conflict", "skip", "-y"])
                .unwrap();
        assert_eq!(cli.on_conflict, Some(ConflictPolicy::Skip));
        assert!(cli.yes);

        let err = Cli::try_parse_from(["safecp", "-s", "a", "-d", "o", "--on-conflict", "never"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["safecp", "-d", "out"]).is_err());
        assert!(Cli::try_parse_from(["safecp", "-s", "a"]).is_err());
    }
}
