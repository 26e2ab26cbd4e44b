//! Logging and terminal setup shared by the `modtest` binary.
//!
//! Dispatcher diagnostics always go to stderr. stdout belongs to pytest.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub use verbosity::VerbosityLevel;

mod verbosity;

/// Replaces the verbosity-derived filter when set, e.g. `MODTEST_LOG=modtest_runner=trace`.
pub const MODTEST_LOG: &str = "MODTEST_LOG";

/// Install the global tracing subscriber for the given verbosity level.
pub fn setup_tracing(level: VerbosityLevel) -> anyhow::Result<()> {
    let filter = match std::env::var(MODTEST_LOG) {
        Ok(directives) => EnvFilter::builder()
            .parse(&directives)
            .with_context(|| format!("Invalid `{MODTEST_LOG}` filter `{directives}`"))?,
        Err(_) => EnvFilter::new(level.level_filter().to_string()),
    };

    if level.is_trace() {
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .try_init()
            .context("Failed to install the tracing subscriber")?;
    } else {
        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(level >= VerbosityLevel::ExtraVerbose)
            .without_time();

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt)
            .try_init()
            .context("Failed to install the tracing subscriber")?;
    }

    Ok(())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TerminalColor {
    /// Colorize output when stdout is a terminal.
    #[default]
    Auto,

    /// Always colorize output.
    Always,

    /// Never colorize output.
    Never,
}

pub fn set_colored_override(color: Option<TerminalColor>) {
    let Some(color) = color else {
        return;
    };

    match color {
        TerminalColor::Auto => colored::control::unset_override(),
        TerminalColor::Always => colored::control::set_override(true),
        TerminalColor::Never => colored::control::set_override(false),
    }
}
