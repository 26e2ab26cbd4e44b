use modtest::{ExitStatus, modtest_main};

fn main() -> ExitStatus {
    modtest_main()
}
