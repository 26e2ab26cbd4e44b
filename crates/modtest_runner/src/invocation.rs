use std::fmt;
use std::process::{Command, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use modtest_metadata::ProjectSettings;

use crate::exit::exit_code;
use crate::selection::Selection;

/// Flags every pytest run gets: verbose, short tracebacks, no output capture.
const PYTEST_FLAGS: [&str; 3] = ["-v", "--tb=short", "-s"];

/// A fully resolved `python -m pytest ...` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PytestInvocation {
    python: Utf8PathBuf,
    cwd: Utf8PathBuf,
    args: Vec<String>,
}

impl PytestInvocation {
    pub fn new(python: Utf8PathBuf, settings: &ProjectSettings, selection: &Selection) -> Self {
        let mut args: Vec<String> = ["-m", "pytest"]
            .into_iter()
            .chain(PYTEST_FLAGS)
            .map(ToString::to_string)
            .collect();

        args.extend(settings.extra_args().iter().cloned());
        args.push(selection.target(settings).into_string());

        Self {
            python,
            cwd: settings.root().to_path_buf(),
            args,
        }
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            // Keep pytest's output in order with ours.
            .env("PYTHONUNBUFFERED", "1")
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Run pytest to completion and return its exit code.
    pub fn run(&self) -> Result<i32> {
        let start_time = Instant::now();

        tracing::info!(cwd = %self.cwd, "Running `{self}`");

        let mut child = self
            .command()
            .spawn()
            .with_context(|| format!("Failed to spawn `{}`", self.python))?;

        let status = child.wait().context("Failed to wait for pytest")?;
        let code = exit_code(status);

        if status.success() {
            tracing::info!("pytest completed successfully in {:.2?}", start_time.elapsed());
        } else {
            tracing::info!(
                "pytest exited with code {code} in {:.2?}",
                start_time.elapsed()
            );
        }

        Ok(code)
    }
}

impl fmt::Display for PytestInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shell_word(f, self.python.as_str())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_shell_word(f, arg)?;
        }
        Ok(())
    }
}

/// Characters a POSIX shell never treats specially.
fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-'
        )
}

fn write_shell_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    let needs_quotes = word.is_empty() || !word.chars().all(is_shell_safe);

    if needs_quotes {
        write!(f, "'{}'", word.replace('\'', r"'\''"))
    } else {
        f.write_str(word)
    }
}
