use std::io::{self, BufWriter, Write};
use std::process::{ExitCode, Termination};

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use clap::Parser;
use colored::Colorize;
use modtest_cli::Args;
use modtest_logging::{set_colored_override, setup_tracing};
use modtest_metadata::{ProjectMetadata, ProjectOptionsOverrides};
use modtest_runner::{DispatchConfig, Dispatched, Selection, list_modules};

pub fn modtest_main() -> ExitStatus {
    run().unwrap_or_else(|error| {
        if is_broken_pipe(&error) {
            return ExitStatus::SUCCESS;
        }

        let mut stderr = std::io::stderr().lock();

        writeln!(stderr, "{}", "modtest failed".red().bold()).ok();
        for cause in error.chain() {
            writeln!(stderr, "  {} {cause}", "Cause:".bold()).ok();
        }

        ExitStatus::Error
    })
}

/// A closed stdout (`modtest --list | head -n1`) is not a failure.
fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|ioerr| ioerr.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn run() -> Result<ExitStatus> {
    let args = wild::args_os();

    let args = argfile::expand_args_from(args, argfile::parse_fromfile, argfile::PREFIX)
        .context("Failed to read CLI arguments from file")?;

    let args = Args::parse_from(args);

    dispatch(args)
}

fn dispatch(args: Args) -> Result<ExitStatus> {
    set_colored_override(args.color);

    let verbosity = args.verbosity.level();
    setup_tracing(verbosity)?;

    let cwd = {
        let cwd = std::env::current_dir().context("Failed to get the current working directory")?;
        Utf8PathBuf::from_path_buf(cwd)
            .map_err(|path| {
                anyhow!(
                    "The current working directory `{}` contains non-Unicode characters. modtest only supports Unicode paths.",
                    path.display()
                )
            })?
    };

    tracing::debug!(cwd = %cwd, "Working directory");

    if !args.ignored.is_empty() {
        tracing::warn!(
            "Only one module can be selected; ignoring {}",
            args.ignored.join(", ")
        );
    }

    let config_file = args.config_file.as_ref().map(|path| cwd.join(path));

    let mut project_metadata = if let Some(config_file) = &config_file {
        ProjectMetadata::from_config_file(config_file.clone(), &cwd)?
    } else {
        ProjectMetadata::discover(&cwd)?
    };

    project_metadata.apply_overrides(&ProjectOptionsOverrides::new(args.to_options()));

    let settings = project_metadata.to_settings();

    if args.list {
        let modules = list_modules(&settings.absolute_test_dir())?;

        let mut stdout = BufWriter::new(io::stdout().lock());
        for module in modules {
            writeln!(stdout, "{module}")?;
        }
        stdout.flush()?;

        return Ok(ExitStatus::SUCCESS);
    }

    let python = args.python.as_ref().map(|path| cwd.join(path));
    let selection = Selection::from_module(args.module);

    let config = DispatchConfig { dry_run: args.dry_run };

    match modtest_runner::dispatch(&settings, &selection, python.as_deref(), &config)? {
        Dispatched::Ran(code) => Ok(ExitStatus::Child(code)),
        Dispatched::DryRun(invocation) => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{invocation}")?;
            Ok(ExitStatus::SUCCESS)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// pytest ran and exited with this code.
    Child(i32),

    /// The dispatcher failed before pytest could run.
    Error,
}

impl ExitStatus {
    pub const SUCCESS: Self = Self::Child(0);

    /// The process exit code. Codes are truncated to a byte, but a failure never becomes `0`.
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Child(code) => {
                let byte = (code & 0xff) as u8;
                if code != 0 && byte == 0 { 1 } else { byte }
            }
            Self::Error => 2,
        }
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self.to_u8())
    }
}
