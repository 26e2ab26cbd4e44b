use anyhow::Result;
use camino::Utf8Path;
use modtest_metadata::ProjectSettings;

mod exit;
mod invocation;
mod python;
mod selection;
mod shutdown;

pub use invocation::PytestInvocation;
pub use python::InterpreterError;
pub use selection::{Selection, list_modules};

use crate::python::{PythonEnvironment, find_python_interpreter};

pub struct DispatchConfig {
    /// Print the command instead of running it.
    pub dry_run: bool,
}

/// The outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// pytest ran and exited with this code.
    Ran(i32),

    /// Nothing was spawned; this is the command that would have run.
    DryRun(PytestInvocation),
}

/// Resolve the interpreter and run pytest for `selection`.
///
/// `python` is an explicit interpreter from the command line; it overrides the project settings.
pub fn dispatch(
    settings: &ProjectSettings,
    selection: &Selection,
    python: Option<&Utf8Path>,
    config: &DispatchConfig,
) -> Result<Dispatched> {
    let python = find_python_interpreter(
        python.or(settings.python()),
        settings.root(),
        &PythonEnvironment::from_env(),
    )?;

    tracing::debug!(%selection, python = %python, "Dispatching");

    let invocation = PytestInvocation::new(python, settings, selection);

    if config.dry_run {
        return Ok(Dispatched::DryRun(invocation));
    }

    shutdown::install_interrupt_handler()?;

    invocation.run().map(Dispatched::Ran)
}
