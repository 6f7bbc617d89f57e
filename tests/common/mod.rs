#![allow(dead_code)]

pub use dist_executor_test_utils::builders::{ExecutorConfigBuilder, FakeEnv};
pub use dist_executor_test_utils::fake_work::{FakeResponse, FakeWorkSession};
pub use dist_executor_test_utils::{argv, init_tracing, with_timeout};

use dist_executor::types::ExecutionResult;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn remote_result(stdout: &str, stderr: &str, exit_code: i32) -> ExecutionResult {
    ExecutionResult {
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        exit_code,
    }
}
