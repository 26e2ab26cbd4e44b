use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

mod configuration_file;
mod options;
mod pyproject;
mod settings;

pub use self::{
    configuration_file::{ConfigurationFile, ConfigurationFileError},
    options::{DEFAULT_TEST_DIR, ModtestTomlError, Options, ProjectOptionsOverrides},
    pyproject::{PyProject, PyProjectError},
    settings::ProjectSettings,
};

const MODTEST_CONFIG_FILE_NAME: &str = "modtest.toml";
const PYPROJECT_FILE_NAME: &str = "pyproject.toml";

#[derive(Default, Debug, Clone)]
pub struct ProjectMetadata {
    pub(crate) root: Utf8PathBuf,

    /// Raw options
    pub(crate) options: Options,
}

impl ProjectMetadata {
    /// Creates a project rooted at `root` that uses the default options.
    pub fn new(root: Utf8PathBuf) -> Self {
        Self {
            root,
            options: Options::default(),
        }
    }

    /// Loads the options from an explicitly chosen configuration file.
    ///
    /// The project root is the current working directory, not the file's directory.
    pub fn from_config_file(path: Utf8PathBuf, cwd: &Utf8Path) -> Result<Self, ProjectMetadataError> {
        tracing::debug!("Using overridden configuration file at '{path}'");

        let config_file = ConfigurationFile::from_path(path.clone()).map_err(|error| {
            ProjectMetadataError::ConfigurationFileError {
                source: Box::new(error),
                path,
            }
        })?;

        tracing::debug!("Loaded options from '{}'", config_file.path());

        Ok(Self {
            root: cwd.to_path_buf(),
            options: config_file.into_options(),
        })
    }

    fn from_pyproject(pyproject: PyProject, root: Utf8PathBuf) -> Self {
        Self {
            root,
            options: pyproject
                .tool
                .and_then(|tool| tool.modtest)
                .unwrap_or_default(),
        }
    }

    /// Discovers the closest project at `path` and returns its metadata.
    ///
    /// The algorithm walks up `path`'s ancestors and resolves the project root by precedence:
    ///
    /// 1. The closest `modtest.toml` or `pyproject.toml` with a `tool.modtest` section.
    /// 1. The closest `pyproject.toml`.
    /// 1. `path` itself, with the default settings.
    pub fn discover(path: &Utf8Path) -> Result<Self, ProjectMetadataError> {
        tracing::debug!("Searching for a project in '{path}'");

        if !path.is_dir() {
            return Err(ProjectMetadataError::NotADirectory(path.to_path_buf()));
        }

        let mut closest_project: Option<Self> = None;

        for project_root in path.ancestors() {
            let pyproject_path = project_root.join(PYPROJECT_FILE_NAME);

            let pyproject = if let Ok(pyproject_str) = std::fs::read_to_string(&pyproject_path) {
                match PyProject::from_toml_str(&pyproject_str) {
                    Ok(pyproject) => Some(pyproject),
                    Err(error) => {
                        return Err(ProjectMetadataError::InvalidPyProject {
                            path: pyproject_path,
                            source: Box::new(error),
                        });
                    }
                }
            } else {
                None
            };

            // A `modtest.toml` takes precedence over a `pyproject.toml`.
            let modtest_toml_path = project_root.join(MODTEST_CONFIG_FILE_NAME);
            if let Ok(modtest_str) = std::fs::read_to_string(&modtest_toml_path) {
                let options = match Options::from_toml_str(&modtest_str) {
                    Ok(options) => options,
                    Err(error) => {
                        return Err(ProjectMetadataError::InvalidModtestToml {
                            path: modtest_toml_path,
                            source: Box::new(error),
                        });
                    }
                };

                if pyproject
                    .as_ref()
                    .is_some_and(|project| project.modtest().is_some())
                {
                    tracing::warn!(
                        "Ignoring the `tool.modtest` section in `{pyproject_path}` because `{modtest_toml_path}` takes precedence."
                    );
                }

                tracing::debug!("Found project at '{}'", project_root);

                return Ok(Self {
                    root: project_root.to_path_buf(),
                    options,
                });
            }

            if let Some(pyproject) = pyproject {
                let has_modtest_section = pyproject.modtest().is_some();
                let metadata = Self::from_pyproject(pyproject, project_root.to_path_buf());

                if has_modtest_section {
                    tracing::debug!("Found project at '{}'", project_root);

                    return Ok(metadata);
                }

                // Not a project itself, keep looking for an enclosing project.
                if closest_project.is_none() {
                    closest_project = Some(metadata);
                }
            }
        }

        let metadata = if let Some(closest_project) = closest_project {
            tracing::debug!(
                "Project without `tool.modtest` section: '{}'",
                closest_project.root()
            );

            closest_project
        } else {
            tracing::debug!(
                "The ancestor directories contain no `pyproject.toml`. Falling back to '{path}'."
            );

            Self::new(path.to_path_buf())
        };

        Ok(metadata)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub const fn options(&self) -> &Options {
        &self.options
    }

    pub fn apply_overrides(&mut self, overrides: &ProjectOptionsOverrides) {
        self.options = overrides.apply_to(std::mem::take(&mut self.options));
    }

    pub fn to_settings(&self) -> ProjectSettings {
        self.options.to_settings(&self.root)
    }
}

#[derive(Debug, Error)]
pub enum ProjectMetadataError {
    #[error("project path '{0}' is not a directory")]
    NotADirectory(Utf8PathBuf),

    #[error("{path} is not a valid `pyproject.toml`: {source}")]
    InvalidPyProject {
        source: Box<PyProjectError>,
        path: Utf8PathBuf,
    },

    #[error("{path} is not a valid `modtest.toml`: {source}")]
    InvalidModtestToml {
        source: Box<ModtestTomlError>,
        path: Utf8PathBuf,
    },

    #[error("Error loading configuration file at {path}: {source}")]
    ConfigurationFileError {
        source: Box<ConfigurationFileError>,
        path: Utf8PathBuf,
    },
}
