use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::options::{ModtestTomlError, Options};

/// A `modtest.toml` configuration file with the options it contains.
pub struct ConfigurationFile {
    path: Utf8PathBuf,
    options: Options,
}

impl ConfigurationFile {
    pub(crate) fn from_path(path: Utf8PathBuf) -> Result<Self, ConfigurationFileError> {
        let modtest_toml_str = std::fs::read_to_string(&path).map_err(|source| {
            ConfigurationFileError::FileReadError {
                source,
                path: path.clone(),
            }
        })?;

        match Options::from_toml_str(&modtest_toml_str) {
            Ok(options) => Ok(Self { path, options }),
            Err(error) => Err(ConfigurationFileError::InvalidModtestToml {
                source: Box::new(error),
                path,
            }),
        }
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(crate) fn into_options(self) -> Options {
        self.options
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationFileError {
    #[error("{path} is not a valid `modtest.toml`: {source}")]
    InvalidModtestToml {
        source: Box<ModtestTomlError>,
        path: Utf8PathBuf,
    },
    #[error("Failed to read `{path}`: {source}")]
    FileReadError {
        #[source]
        source: std::io::Error,
        path: Utf8PathBuf,
    },
}
