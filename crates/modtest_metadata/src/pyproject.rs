use serde::Deserialize;
use thiserror::Error;

use crate::options::Options;

/// The parts of a `pyproject.toml` modtest cares about.
#[derive(Debug, Default, Deserialize)]
pub struct PyProject {
    pub tool: Option<Tool>,
}

impl PyProject {
    pub fn from_toml_str(content: &str) -> Result<Self, PyProjectError> {
        toml::from_str(content).map_err(PyProjectError::TomlSyntax)
    }

    pub fn modtest(&self) -> Option<&Options> {
        self.tool.as_ref().and_then(|tool| tool.modtest.as_ref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Tool {
    pub modtest: Option<Options>,
}

#[derive(Error, Debug)]
pub enum PyProjectError {
    #[error(transparent)]
    TomlSyntax(#[from] toml::de::Error),
}
