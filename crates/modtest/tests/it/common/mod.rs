use std::os::unix::fs::PermissionsExt;
use std::process::Command;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use insta::Settings;
use insta::internals::SettingsBindDropGuard;
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

/// Stands in for `python -m pytest`: echoes its arguments and exits like pytest would.
///
/// A missing target is a collection error (exit code 4). `STUB_EXIT_CODE` sets the exit code
/// otherwise and `STUB_SIGNAL` makes the stub kill itself. With `STUB_WAIT_FOR_INTERRUPT` the
/// stub writes its pid to `started` and waits for SIGINT, then exits 2 like an interrupted pytest.
const FAKE_PYTHON: &str = r#"#!/bin/sh
echo "python $*"
echo "PYTHONUNBUFFERED=$PYTHONUNBUFFERED"
if [ -n "$STUB_WAIT_FOR_INTERRUPT" ]; then
    trap 'echo "interrupted"; exit 2' INT
    echo $$ > started.tmp
    mv started.tmp started
    while :; do sleep 1; done
fi
for target; do :; done
if [ -n "$STUB_SIGNAL" ]; then
    kill -"$STUB_SIGNAL" $$
fi
if [ ! -e "$target" ]; then
    echo "ERROR: file or directory not found: $target"
    exit 4
fi
exit "${STUB_EXIT_CODE:-0}"
"#;

pub const FAKE_PYTHON_NAME: &str = "fake-python";

pub struct TestContext {
    _temp_dir: TempDir,
    project_dir_path: Utf8PathBuf,
    _settings_scope: SettingsBindDropGuard,
}

impl TestContext {
    /// A project with a stub interpreter configured in `modtest.toml`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        // Canonicalize because macos uses symlinks for tempdirs.
        let project_path = Utf8PathBuf::from_path_buf(
            dunce::simplified(
                &temp_dir
                    .path()
                    .canonicalize()
                    .context("Failed to canonicalize project path")
                    .unwrap(),
            )
            .to_path_buf(),
        )
        .expect("Path is not valid UTF-8");

        let mut settings = Settings::clone_current();
        settings.add_filter(&tempdir_filter(&project_path), "<temp_dir>/");
        settings.add_filter(r"\x1b\[[0-9;]*m", "");

        let settings_scope = settings.bind_to_scope();

        let context = Self {
            project_dir_path: project_path,
            _temp_dir: temp_dir,
            _settings_scope: settings_scope,
        };

        context.write_executable(FAKE_PYTHON_NAME, FAKE_PYTHON);
        context.write_file(
            "modtest.toml",
            &format!("python = \"{FAKE_PYTHON_NAME}\"\n"),
        );

        context
    }

    pub fn root(&self) -> Utf8PathBuf {
        self.project_dir_path.clone()
    }

    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let case = Self::default();
        case.write_files(files);
        case
    }

    pub fn write_files<'a>(&self, files: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (path, content) in files {
            self.write_file(path, content);
        }
    }

    pub fn write_file(&self, path: impl AsRef<Utf8Path>, content: &str) {
        let path = self.project_dir_path.join(path.as_ref());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory `{parent}`"))
                .unwrap();
        }

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write file `{path}`"))
            .unwrap();
    }

    pub fn remove_file(&self, path: impl AsRef<Utf8Path>) {
        let path = self.project_dir_path.join(path.as_ref());
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove file `{path}`"))
            .unwrap();
    }

    fn write_executable(&self, path: &str, content: &str) {
        self.write_file(path, content);
        let path = self.project_dir_path.join(path);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make `{path}` executable"))
            .unwrap();
    }

    /// `modtest` run from the project root with a clean environment.
    pub fn command(&self) -> Command {
        let mut command = Command::new(get_cargo_bin("modtest"));
        command
            .current_dir(self.root())
            .env_remove("MODTEST_PYTHON")
            .env_remove("MODTEST_CONFIG_FILE")
            .env_remove("MODTEST_LOG")
            .env_remove("VIRTUAL_ENV")
            .env_remove("STUB_EXIT_CODE")
            .env_remove("STUB_SIGNAL")
            .env_remove("STUB_WAIT_FOR_INTERRUPT");
        command
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tempdir_filter(path: &Utf8Path) -> String {
    format!(r"{}\\?/?", regex::escape(path.as_str()))
}
