use std::fmt;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use modtest_metadata::ProjectSettings;

pub const MODULE_PREFIX: &str = "test_";
pub const MODULE_SUFFIX: &str = ".py";

/// What a single dispatcher invocation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every test pytest collects from the test directory.
    All,

    /// Only `test_<name>.py` inside the test directory.
    ///
    /// The name is used as given. Nothing checks that the file exists; pytest reports
    /// a missing file as a collection error.
    Module(String),
}

impl Selection {
    pub fn from_module(module: Option<String>) -> Self {
        module.map_or(Self::All, Self::Module)
    }

    /// The path handed to pytest, relative to the project root unless the test
    /// directory itself is absolute.
    pub fn target(&self, settings: &ProjectSettings) -> Utf8PathBuf {
        match self {
            Self::All => settings.test_dir().to_path_buf(),
            Self::Module(name) => settings.test_dir().join(module_file_name(name)),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all modules"),
            Self::Module(name) => write!(f, "module `{name}`"),
        }
    }
}

pub(crate) fn module_file_name(name: &str) -> String {
    format!("{MODULE_PREFIX}{name}{MODULE_SUFFIX}")
}

/// The module name for a `test_<name>.py` file name, if it is one.
pub fn module_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(MODULE_PREFIX)?
        .strip_suffix(MODULE_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Names of every module directly inside the test directory, sorted.
pub fn list_modules(test_dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let entries = test_dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read test directory `{test_dir}`"))?;

    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read test directory `{test_dir}`"))?;

        if !entry.path().is_file() {
            continue;
        }

        if let Some(name) = module_name(entry.file_name()) {
            modules.push(name.to_string());
        }
    }

    modules.sort_unstable();

    tracing::debug!(count = modules.len(), "Listed modules in '{test_dir}'");

    Ok(modules)
}
