use camino::Utf8PathBuf;
use clap::Parser;
use modtest_logging::{TerminalColor, VerbosityLevel};
use modtest_metadata::Options;

#[derive(Debug, Parser)]
#[command(
    author,
    name = "modtest",
    about = "Run a project's pytest suite, or a single `test_<MODULE>.py` from it."
)]
#[command(version)]
pub struct Args {
    /// Run only `<test-dir>/test_<MODULE>.py` instead of the whole test directory.
    ///
    /// Any name is accepted. Put it after `--` if it collides with a modtest flag, and note that
    /// a leading `@` reads arguments from a file.
    #[arg(value_name = "MODULE", allow_hyphen_values = true)]
    pub module: Option<String>,

    /// Positional arguments after MODULE are accepted and ignored.
    #[arg(value_name = "IGNORED", hide = true)]
    pub ignored: Vec<String>,

    /// Directory containing the test modules [default: tests].
    #[arg(long, value_name = "DIR")]
    pub test_dir: Option<String>,

    /// Python interpreter used to run pytest.
    #[arg(long, value_name = "PATH", env = "MODTEST_PYTHON")]
    pub python: Option<Utf8PathBuf>,

    /// Path to a `modtest.toml` to use instead of discovering one.
    #[arg(long, value_name = "PATH", env = "MODTEST_CONFIG_FILE")]
    pub config_file: Option<Utf8PathBuf>,

    /// List the module names in the test directory and exit.
    #[arg(long, conflicts_with = "module")]
    pub list: bool,

    /// Print the pytest command line instead of running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Control when colored output is used.
    #[arg(long, value_name = "WHEN")]
    pub color: Option<TerminalColor>,

    #[clap(flatten)]
    pub verbosity: Verbosity,
}

impl Args {
    /// Command line values that override the project's configuration.
    ///
    /// `--python` is left out: it is relative to the working directory, not the project root,
    /// and is resolved separately by the caller.
    pub fn to_options(&self) -> Options {
        Options {
            test_dir: self.test_dir.clone(),
            python: None,
            extra_args: None,
        }
    }
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct Verbosity {
    /// Use verbose output (or `-vv` and `-vvv` for more verbose output).
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        overrides_with = "quiet"
    )]
    verbose: u8,

    /// Only print dispatcher errors.
    #[arg(long, short = 'q', global = true, overrides_with = "verbose")]
    quiet: bool,
}

impl Verbosity {
    pub const fn level(&self) -> VerbosityLevel {
        VerbosityLevel::from_flags(self.verbose, self.quiet)
    }
}
