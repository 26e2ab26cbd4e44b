use camino::{Utf8Path, Utf8PathBuf};

/// Fully resolved project settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    pub(crate) root: Utf8PathBuf,
    pub(crate) test_dir: Utf8PathBuf,
    pub(crate) python: Option<Utf8PathBuf>,
    pub(crate) extra_args: Vec<String>,
}

impl ProjectSettings {
    /// The directory pytest runs in.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The test directory as configured, usually relative to [`Self::root`].
    pub fn test_dir(&self) -> &Utf8Path {
        &self.test_dir
    }

    pub fn absolute_test_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.test_dir)
    }

    pub fn python(&self) -> Option<&Utf8Path> {
        self.python.as_deref()
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}
