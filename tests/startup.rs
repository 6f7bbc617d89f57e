// tests/startup.rs
//
// Drives `run_with`, which installs a process-wide signal watcher, and raises
// a real signal, so it lives in its own test binary.
#![cfg(unix)]

mod common;
use crate::common::*;

use std::time::Duration;

use nix::sys::signal::{raise, Signal};
use tokio::sync::oneshot;
use tokio::time::timeout;

use dist_executor::config::{ExecutorConfig, KEY_CONTROLLER_PORT, KEY_CONTROLLER_TIMEOUT, KEY_WORK_ID};
use dist_executor::errors::ExecutorError;
use dist_executor::run_with;

#[tokio::test]
async fn direct_run_never_validates_controller_settings() {
    let env = FakeEnv::new()
        .with(KEY_CONTROLLER_PORT, "not-a-port")
        .with(KEY_CONTROLLER_TIMEOUT, "soon");
    let config = ExecutorConfig::from_lookup(|k| env.lookup(k));

    let outcome = with_timeout(run_with(config, argv(&["sh", "-c", "exit 4"]), |_| {})).await;

    assert_eq!(outcome.exit_code, 4);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn watcher_is_live_before_controller_setup() -> TestResult {
    let env = FakeEnv::new()
        .with(KEY_WORK_ID, "work-1")
        .with(KEY_CONTROLLER_PORT, "not-a-port");
    let config = ExecutorConfig::from_lookup(|k| env.lookup(k));

    let (tx, rx) = oneshot::channel();
    let outcome = with_timeout(run_with(config, argv(&["hello"]), move |code| {
        let _ = tx.send(code);
    }))
    .await;

    // Controller setup failed, but the watcher was already installed.
    assert_eq!(outcome.exit_code, -1);
    match outcome.error {
        Some(ExecutorError::ConfigError(msg)) => assert!(msg.contains("BK_DIST_CONTROLLER_PORT")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }

    raise(Signal::SIGINT)?;
    let code = timeout(Duration::from_secs(5), rx).await??;
    assert_eq!(code, 130);
    Ok(())
}
