// tests/coordinated_mode.rs

mod common;
use crate::common::*;

use std::time::Duration;

use dist_executor::errors::ExecutorError;
use dist_executor::types::BuildType;
use dist_executor::{DistExecutor, ExecutionMode};

fn cc_config() -> dist_executor::config::ExecutorConfig {
    ExecutorConfigBuilder::new()
        .work_id("work-1")
        .task_id("task-9")
        .build_type(BuildType::Cc)
        .build()
}

#[tokio::test]
async fn remote_failure_forwards_stderr_and_exit_code() -> TestResult {
    init_tracing();

    let work = FakeWorkSession::new(
        "work-1",
        FakeResponse::Result(remote_result("", "error: X", 2)),
    );
    let log = work.log_handle();
    let mut executor =
        DistExecutor::new(cc_config(), work, argv(&["gcc", "-c", "a.c"])).with_code_page(None);
    assert_eq!(executor.mode(), ExecutionMode::Coordinated);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 2);
    assert!(outcome.error.is_none());
    assert!(out.is_empty());
    assert_eq!(String::from_utf8(err)?, "error: X");

    let log = log.lock().unwrap();
    assert_eq!(log.submitted, vec![vec!["gcc", "-c", "a.c"]]);
    assert_eq!(log.recorded_stats.len(), 1);
    Ok(())
}

#[tokio::test]
async fn zero_arguments_is_a_usage_error_with_exit_code_zero() {
    init_tracing();

    let work = FakeWorkSession::new("work-1", FakeResponse::RunHandler);
    let log = work.log_handle();
    let mut executor = DistExecutor::new(cc_config(), work, argv(&[]));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 0);
    match outcome.error {
        Some(e @ ExecutorError::NotEnoughArgs) => {
            assert_eq!(e.to_string(), "not enough args to execute");
        }
        other => panic!("Expected NotEnoughArgs, got: {:?}", other),
    }
    assert!(out.is_empty());
    assert!(err.is_empty());
    assert!(executor.stats().is_some(), "coordinated mode always creates job stats");

    let log = log.lock().unwrap();
    assert!(log.submitted.is_empty());
    assert!(log.recorded_stats.is_empty());
}

#[tokio::test]
async fn success_writes_each_stream_once_and_records_stats_once() -> TestResult {
    init_tracing();

    let work = FakeWorkSession::new(
        "work-1",
        FakeResponse::Result(remote_result("compiled\n", "warning: W\n", 0)),
    );
    let log = work.log_handle();
    let mut executor = DistExecutor::new(cc_config(), work, argv(&["gcc", "-c", "a.c"]))
        .with_code_page(None);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.error.is_none());
    assert_eq!(String::from_utf8(out)?, "compiled\n");
    assert_eq!(String::from_utf8(err)?, "warning: W\n");

    let log = log.lock().unwrap();
    assert_eq!(log.recorded_stats.len(), 1);
    let stats = &log.recorded_stats[0];
    assert_eq!(stats.pid, std::process::id());
    assert!(stats.id.starts_with(&format!("{}_", std::process::id())));
    assert_eq!(stats.work_id, "work-1");
    assert_eq!(stats.task_id, "task-9");
    assert_eq!(stats.booster_type, "cc");
    assert_eq!(stats.origin_args, vec!["gcc", "-c", "a.c"]);
    assert!(stats.enter_time.is_some());
    assert!(stats.leave_time.is_some());
    assert_eq!(log.submitted_stats_ids, vec![stats.id.clone()]);
    Ok(())
}

#[tokio::test]
async fn unknown_build_type_fails_before_submission() {
    init_tracing();

    let config = ExecutorConfigBuilder::new()
        .work_id("work-1")
        .build_type(BuildType::Unknown("distcc-nightly".to_string()))
        .build();
    let work = FakeWorkSession::new("work-1", FakeResponse::RunHandler);
    let log = work.log_handle();
    let mut executor = DistExecutor::new(config, work, argv(&["gcc", "a.c"]));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, -1);
    match outcome.error {
        Some(e @ ExecutorError::UnknownHandler(_)) => {
            assert_eq!(e.to_string(), "unknown handler distcc-nightly");
        }
        other => panic!("Expected UnknownHandler, got: {:?}", other),
    }
    assert!(log.lock().unwrap().submitted.is_empty());
}

#[tokio::test]
async fn dispatch_failure_returns_minus_one_without_output_or_stats() {
    init_tracing();

    let work = FakeWorkSession::new("work-1", FakeResponse::Fail("controller down".to_string()));
    let log = work.log_handle();
    let mut executor = DistExecutor::new(cc_config(), work, argv(&["gcc", "a.c"]));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, -1);
    assert!(matches!(outcome.error, Some(ExecutorError::Controller { .. })));
    assert!(out.is_empty());
    assert!(err.is_empty());
    assert!(log.lock().unwrap().recorded_stats.is_empty());
}

#[tokio::test]
async fn failed_stats_upload_does_not_change_the_outcome() -> TestResult {
    init_tracing();

    let work = FakeWorkSession::new("work-1", FakeResponse::Result(remote_result("ok\n", "", 0)))
        .failing_stats_update();
    let log = work.log_handle();
    let mut executor =
        DistExecutor::new(cc_config(), work, argv(&["gcc", "a.c"])).with_code_page(None);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.error.is_none());
    assert_eq!(String::from_utf8(out)?, "ok\n");
    assert_eq!(log.lock().unwrap().recorded_stats.len(), 1);
    Ok(())
}

#[tokio::test]
async fn echo_handler_runs_through_the_session() -> TestResult {
    init_tracing();

    let config = ExecutorConfigBuilder::new()
        .work_id("work-1")
        .build_type(BuildType::Echo)
        .build();
    let work = FakeWorkSession::new("work-1", FakeResponse::RunHandler);
    let log = work.log_handle();
    let mut executor =
        DistExecutor::new(config, work, argv(&["hello", "world"])).with_code_page(None);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(String::from_utf8(out)?, "hello world\n");
    assert!(err.is_empty());

    let log = log.lock().unwrap();
    let stats = &log.recorded_stats[0];
    assert!(stats.local);
    assert!(stats.success);
    assert_eq!(stats.booster_type, "echo");
    assert!(stats.local_exec_start_time.is_some());
    Ok(())
}

#[tokio::test]
async fn output_is_reencoded_for_a_legacy_console() {
    init_tracing();

    let work = FakeWorkSession::new(
        "work-1",
        FakeResponse::Result(remote_result("中文\n", "", 0)),
    );
    let mut executor =
        DistExecutor::new(cc_config(), work, argv(&["cl", "/c", "a.cpp"])).with_code_page(Some(936));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = with_timeout(executor.execute(&mut out, &mut err)).await;

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(out, vec![0xD6, 0xD0, 0xCE, 0xC4, b'\n']);
}

#[tokio::test]
async fn job_ids_are_unique_across_invocations() {
    let mut ids = Vec::new();
    for _ in 0..3 {
        let work = FakeWorkSession::new("work-1", FakeResponse::Result(remote_result("", "", 0)));
        let mut executor = DistExecutor::new(cc_config(), work, argv(&["gcc", "a.c"]));
        let (mut out, mut err) = (Vec::new(), Vec::new());
        executor.execute(&mut out, &mut err).await;
        ids.push(executor.stats().map(|s| s.id.clone()).unwrap_or_default());
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}
