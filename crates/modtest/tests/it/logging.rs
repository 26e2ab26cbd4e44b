use insta_cmd::assert_cmd_snapshot;

use crate::common::TestContext;

fn context() -> TestContext {
    TestContext::with_files([("tests/test_billing.py", ""), ("tests/test_menu.py", "")])
}

#[test]
fn quiet_hides_warnings() {
    let context = context();

    assert_cmd_snapshot!(context.command().args(["-q", "billing", "menu"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    python -m pytest -v --tb=short -s tests/test_billing.py
    PYTHONUNBUFFERED=1

    ----- stderr -----
    ");
}

#[test]
fn modtest_log_replaces_the_verbosity_filter() {
    let context = context();

    assert_cmd_snapshot!(context.command().env("MODTEST_LOG", "error").args(["billing", "menu"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    python -m pytest -v --tb=short -s tests/test_billing.py
    PYTHONUNBUFFERED=1

    ----- stderr -----
    ");
}

#[test]
fn modtest_log_enables_runner_events() {
    let context = context();

    let output = context
        .command()
        .env("MODTEST_LOG", "modtest_runner=info")
        .arg("billing")
        .output()
        .expect("Failed to run modtest");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr.contains("INFO"), "{stderr}");
    assert!(stderr.contains("Running `"), "{stderr}");
}

#[test]
fn invalid_modtest_log_filter() {
    let context = context();

    let output = context
        .command()
        .env("MODTEST_LOG", "modtest[")
        .arg("billing")
        .output()
        .expect("Failed to run modtest");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr.contains("Invalid `MODTEST_LOG` filter `modtest[`"),
        "{stderr}"
    );
    assert!(output.stdout.is_empty());
}

fn missing_interpreter_stderr(color: &str) -> String {
    let context = TestContext::with_files([("modtest.toml", "python = \"missing-python\"\n")]);

    let output = context
        .command()
        .args(["--color", color, "billing"])
        .output()
        .expect("Failed to run modtest");

    assert_eq!(output.status.code(), Some(2));
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn color_always_styles_the_error_report() {
    let stderr = missing_interpreter_stderr("always");

    assert!(stderr.contains("\u{1b}["), "{stderr}");
    assert!(stderr.contains("modtest failed"), "{stderr}");
}

#[test]
fn color_never_keeps_the_error_report_plain() {
    let stderr = missing_interpreter_stderr("never");

    assert!(!stderr.contains('\u{1b}'), "{stderr}");
    assert!(stderr.starts_with("modtest failed\n"), "{stderr}");
}
