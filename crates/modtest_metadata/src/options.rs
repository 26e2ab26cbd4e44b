use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

use crate::settings::ProjectSettings;

/// The options a user can set in `modtest.toml` or under `[tool.modtest]`.
///
/// Every field is optional so that file and command line options can be layered.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// Directory holding the `test_<name>.py` modules, relative to the project root.
    pub test_dir: Option<String>,

    /// Python interpreter used to run `python -m pytest`.
    pub python: Option<Utf8PathBuf>,

    /// Extra arguments passed to pytest after the fixed flags.
    pub extra_args: Option<Vec<String>>,
}

impl Options {
    pub fn from_toml_str(content: &str) -> Result<Self, ModtestTomlError> {
        toml::from_str(content).map_err(ModtestTomlError::TomlSyntax)
    }

    /// Layer `self` over `other`: values set in `self` win.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            test_dir: self.test_dir.or(other.test_dir),
            python: self.python.or(other.python),
            extra_args: self.extra_args.or(other.extra_args),
        }
    }

    pub fn to_settings(&self, root: &Utf8Path) -> ProjectSettings {
        let test_dir = self
            .test_dir
            .as_deref()
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_TEST_DIR), Utf8PathBuf::from);

        ProjectSettings {
            root: root.to_path_buf(),
            test_dir,
            python: self.python.as_ref().map(|python| root.join(python)),
            extra_args: self.extra_args.clone().unwrap_or_default(),
        }
    }
}

pub const DEFAULT_TEST_DIR: &str = "tests";

/// Options given on the command line, applied on top of whatever the project configures.
#[derive(Debug, Default, Clone)]
pub struct ProjectOptionsOverrides {
    pub options: Options,
}

impl ProjectOptionsOverrides {
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn apply_to(&self, options: Options) -> Options {
        self.options.clone().combine(options)
    }
}

#[derive(Error, Debug)]
pub enum ModtestTomlError {
    #[error(transparent)]
    TomlSyntax(#[from] toml::de::Error),
}
