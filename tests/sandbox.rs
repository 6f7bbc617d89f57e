// tests/sandbox.rs
#![cfg(unix)]

mod common;
use crate::common::*;

use dist_executor::exec::{Sandbox, StdioMode};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn captures_stdout_and_exit_code() {
    init_tracing();

    let result = with_timeout(Sandbox::capture().exec_command("echo", &args(&["hello"])))
        .await
        .unwrap();

    assert_eq!(result.stdout, b"hello\n");
    assert!(result.stderr.is_empty());
    assert_eq!(result.exit_code, 0);
}

#[tokio::test]
async fn killed_child_reports_128_plus_signal() {
    let result = with_timeout(
        Sandbox::capture().exec_command("sh", &args(&["-c", "kill -9 $$"])),
    )
    .await
    .unwrap();

    assert_eq!(result.exit_code, 137);
}

#[tokio::test]
async fn runs_in_the_given_directory_with_extra_env() -> TestResult {
    let dir = tempfile::tempdir()?;
    let sandbox = Sandbox::capture()
        .with_dir(dir.path())
        .with_env("DIST_EXECUTOR_TEST_VALUE", "bar");

    let result = with_timeout(
        sandbox.exec_command("sh", &args(&["-c", "pwd -P; printf \"$DIST_EXECUTOR_TEST_VALUE\""])),
    )
    .await?;

    let expected = format!("{}\nbar", dir.path().canonicalize()?.display());
    assert_eq!(String::from_utf8(result.stdout)?, expected);
    Ok(())
}

#[tokio::test]
async fn inherited_stdio_captures_nothing() {
    let sandbox = Sandbox::inherit();
    assert_eq!(sandbox.stdio(), StdioMode::Inherit);

    let result = with_timeout(sandbox.exec_command("true", &[])).await.unwrap();

    assert!(result.stdout.is_empty());
    assert!(result.stderr.is_empty());
    assert_eq!(result.exit_code, 0);
}
