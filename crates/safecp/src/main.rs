//! safecp CLI - Copy files and directories, asking before anything is overwritten

mod cli;
mod colors;
mod interaction;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use safecp_core::{
    Config, ConflictPolicy, ConflictResolver, CopyEngine, CopyOptions, CopyReport,
    InteractionAdapter, PathContext, PolicyResolver, PromptResolver, destination_root,
    ensure_path, load_config, resolve_source,
};

use cli::Cli;
use interaction::CliAdapter;

/// Exit code for failures that stop the run before copying starts
const EXIT_SETUP: u8 = 2;

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the config file and fold command line overrides into it
fn effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.yes {
        config.safecp.confirm_create = false;
    }
    if let Some(policy) = cli.on_conflict {
        config.safecp.on_conflict = policy;
    }
    if cli.no_preserve_mode {
        config.safecp.preserve_mode = false;
    }
    debug!(?config, "effective configuration");
    Ok(config)
}

/// Create the destination root if needed and return its canonical form
fn prepare_destination(
    raw: &str,
    ctx: &PathContext,
    confirm: bool,
    resolver: &mut dyn ConflictResolver,
) -> anyhow::Result<PathBuf> {
    let root = destination_root(raw, ctx);
    ensure_path(&root, confirm, resolver)?;
    fs::canonicalize(&root)
        .with_context(|| format!("failed to resolve destination {}", root.display()))
}

fn run(cli: &Cli, adapter: &CliAdapter) -> anyhow::Result<CopyReport> {
    let config = effective_config(cli)?;
    let ctx = PathContext::current().context("failed to read the working directory")?;

    let mut prompter = PromptResolver::new(adapter);
    let mut policy = PolicyResolver::new(config.safecp.on_conflict);
    let resolver: &mut dyn ConflictResolver = match config.safecp.on_conflict {
        ConflictPolicy::Ask => &mut prompter,
        ConflictPolicy::Overwrite | ConflictPolicy::Skip => &mut policy,
    };

    let root = prepare_destination(
        &cli.destination,
        &ctx,
        config.safecp.confirm_create,
        &mut *resolver,
    )?;
    debug!(root = %root.display(), "destination ready");

    let mut engine = CopyEngine::new(resolver, adapter, CopyOptions::from(&config.safecp));
    for raw in &cli.sources {
        let spec = resolve_source(raw, &ctx);
        engine.copy_source(&spec, &root);
    }
    Ok(engine.into_report())
}

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    let adapter = CliAdapter::new();
    let report = match run(&cli, &adapter) {
        Ok(report) => report,
        Err(e) => {
            adapter.print_error(&format!("error: {:#}", e));
            return ExitCode::from(EXIT_SETUP);
        }
    };

    if !cli.quiet {
        adapter.print_info("Done");
        if report.is_success() {
            adapter.print_success(&report.summary());
        } else {
            adapter.print_warning(&report.summary());
        }
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
