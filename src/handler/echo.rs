// src/handler/echo.rs

use chrono::Utc;

use crate::errors::Result;
use crate::handler::{Handler, HandlerFuture};
use crate::types::{BuildType, ExecutionResult, JobStats};

/// Test handler: answers with its arguments joined by spaces.
#[derive(Debug, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn build_type(&self) -> BuildType {
        BuildType::Echo
    }

    fn execute<'a>(&'a self, args: &'a [String], stats: &'a mut JobStats) -> HandlerFuture<'a> {
        Box::pin(async move {
            let now = Utc::now();
            stats.local = true;
            stats.local_exec_start_time = Some(now);
            stats.local_exec_end_time = Some(now);
            stats.exit_code = 0;
            stats.success = true;

            let mut stdout = args.join(" ").into_bytes();
            stdout.push(b'\n');

            Ok(ExecutionResult {
                stdout,
                stderr: Vec::new(),
                exit_code: 0,
            })
        })
    }
}

pub(crate) fn new_echo() -> Result<Box<dyn Handler>> {
    Ok(Box::new(EchoHandler))
}
