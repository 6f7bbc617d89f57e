// src/executor.rs

//! The dist executor: decides per invocation whether to run the wrapped tool
//! directly or through the controller's work session.
//!
//! - **Direct** (no session id): argv[1..] runs as a plain child process with
//!   inherited stdio, so output and exit code are exactly the tool's own.
//! - **Coordinated**: argv[1..] is submitted to the [`WorkSession`] together
//!   with a fresh [`JobStats`]; the captured output is re-encoded for the
//!   console and written once, and the task's exit code is returned.

use std::io::Write;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::ExecutorConfig;
use crate::console::{console_code_page, forward_output};
use crate::errors::ExecutorError;
use crate::exec::{Sandbox, SPAWN_FAILED_EXIT_CODE};
use crate::handler::get_handler;
use crate::types::{Invocation, JobStats};
use crate::work::WorkSession;

/// How one invocation is executed. Chosen once, never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Direct,
    Coordinated,
}

/// Result of [`DistExecutor::execute`].
///
/// `exit_code` is authoritative for the process exit status. `error`, when
/// present, explains a configuration or dispatch failure; a tool that simply
/// exits non-zero carries no error.
#[derive(Debug)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub error: Option<ExecutorError>,
}

impl RunOutcome {
    pub fn exited(exit_code: i32) -> Self {
        Self {
            exit_code,
            error: None,
        }
    }

    pub fn failed(exit_code: i32, error: ExecutorError) -> Self {
        Self {
            exit_code,
            error: Some(error),
        }
    }
}

pub struct DistExecutor<W: WorkSession> {
    config: ExecutorConfig,
    work: W,
    invocation: Invocation,
    stats: Option<JobStats>,
    code_page: Option<u32>,
}

impl<W: WorkSession> DistExecutor<W> {
    pub fn new(config: ExecutorConfig, work: W, invocation: Invocation) -> Self {
        Self {
            config,
            work,
            invocation,
            stats: None,
            code_page: console_code_page(),
        }
    }

    /// Override the detected console code page.
    pub fn with_code_page(mut self, code_page: Option<u32>) -> Self {
        self.code_page = code_page;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.work.id().is_empty() {
            ExecutionMode::Direct
        } else {
            ExecutionMode::Coordinated
        }
    }

    /// Statistics of the current job; only present in coordinated mode.
    pub fn stats(&self) -> Option<&JobStats> {
        self.stats.as_ref()
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute the invocation, writing coordinated-mode output to `out` and
    /// `err`.
    pub async fn execute<O, E>(&mut self, out: &mut O, err: &mut E) -> RunOutcome
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let command = self.invocation.argv().join(" ");
        info!(%command, "executor: command begins");

        let outcome = match self.mode() {
            ExecutionMode::Direct => self.run_direct().await,
            ExecutionMode::Coordinated => self.run_work(out, err).await,
        };

        info!(%command, exit_code = outcome.exit_code, "executor: command finished");
        outcome
    }

    async fn run_direct(&self) -> RunOutcome {
        let Some((program, args)) = self.invocation.command().split_first() else {
            return RunOutcome::exited(0);
        };

        match Sandbox::inherit().exec_command(program, args).await {
            Ok(result) => RunOutcome::exited(result.exit_code),
            Err(e) => RunOutcome::failed(SPAWN_FAILED_EXIT_CODE, e),
        }
    }

    async fn run_work<O, E>(&mut self, out: &mut O, err: &mut E) -> RunOutcome
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let stats = self.stats.insert(JobStats::new(
            self.work.id(),
            &self.config.task_id,
            &self.config.build_type,
            &self.invocation,
        ));

        let args = self.invocation.command();
        if args.is_empty() {
            error!("executor: not enough args to execute");
            return RunOutcome::failed(0, ExecutorError::NotEnoughArgs);
        }

        let handler = match get_handler(&self.config.build_type) {
            Ok(h) => h,
            Err(e) => {
                error!(error = %e, "executor: no handler for build type, exit code: -1");
                return RunOutcome::failed(SPAWN_FAILED_EXIT_CODE, e);
            }
        };

        let result = match self
            .work
            .execute_local_task(args, stats, handler.as_ref())
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "executor: execute failed, exit code: -1");
                return RunOutcome::failed(SPAWN_FAILED_EXIT_CODE, e);
            }
        };

        stats.leave_time = Some(Utc::now());
        if let Err(e) = self.work.update_job_stats(stats).await {
            warn!(stats_id = %stats.id, error = %e, "failed to record job stats");
        }

        if let Err(e) = forward_output(&result, self.code_page, out, err) {
            warn!(error = %e, "failed to forward task output");
        }

        if result.exit_code != 0 {
            warn!(exit_code = result.exit_code, "executor: task exited with non-zero code");
            return RunOutcome::exited(result.exit_code);
        }

        RunOutcome::exited(0)
    }
}
