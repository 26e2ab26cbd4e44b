use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";

const VENV_DIR: &str = ".venv";
const PATH_CANDIDATES: [&str; 2] = ["python3", "python"];

/// Where an interpreter may come from, besides an explicit path.
#[derive(Debug, Default, Clone)]
pub struct PythonEnvironment {
    /// The root of the active virtual environment, from `VIRTUAL_ENV`.
    pub virtual_env: Option<Utf8PathBuf>,

    /// Whether to fall back to searching `PATH`.
    pub search_path: bool,
}

impl PythonEnvironment {
    pub fn from_env() -> Self {
        let virtual_env = std::env::var(VIRTUAL_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from);

        Self {
            virtual_env,
            search_path: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Python interpreter `{path}` does not exist")]
    Missing { path: Utf8PathBuf },

    #[error(
        "Could not find a Python interpreter. Activate a virtual environment, create `.venv` in `{root}` or pass `--python`"
    )]
    NotFound { root: Utf8PathBuf },
}

/// The interpreter inside the virtual environment rooted at `venv_root`, if it exists.
pub(crate) fn venv_python(venv_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let python = if cfg!(target_os = "windows") {
        venv_root.join("Scripts").join("python.exe")
    } else {
        venv_root.join("bin").join("python")
    };

    if python.exists() { Some(python) } else { None }
}

/// Find the interpreter to run pytest with.
///
/// An explicit interpreter (`--python`, `MODTEST_PYTHON` or the `python` option) always wins
/// and must exist. Otherwise the active virtual environment, the project's `.venv` and
/// finally `PATH` are tried in that order.
pub fn find_python_interpreter(
    explicit: Option<&Utf8Path>,
    root: &Utf8Path,
    environment: &PythonEnvironment,
) -> Result<Utf8PathBuf, InterpreterError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(InterpreterError::Missing {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(path = %path, "Using configured interpreter");
        return Ok(path.to_path_buf());
    }

    if let Some(virtual_env) = &environment.virtual_env {
        if let Some(python) = venv_python(virtual_env) {
            tracing::debug!(path = %python, "Using interpreter from active virtual environment");
            return Ok(python);
        }
        tracing::warn!("`{VIRTUAL_ENV}` is set to `{virtual_env}` but it contains no interpreter");
    }

    if let Some(python) = venv_python(&root.join(VENV_DIR)) {
        tracing::debug!(path = %python, "Using interpreter from project virtual environment");
        return Ok(python);
    }

    if environment.search_path {
        for candidate in PATH_CANDIDATES {
            if let Ok(path) = which::which(candidate) {
                if let Ok(utf8_path) = Utf8PathBuf::try_from(path) {
                    tracing::debug!(path = %utf8_path, "Found interpreter in PATH");
                    return Ok(utf8_path);
                }
            }
        }
    }

    Err(InterpreterError::NotFound {
        root: root.to_path_buf(),
    })
}
