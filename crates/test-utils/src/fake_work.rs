use std::sync::{Arc, Mutex};

use dist_executor::errors::{ExecutorError, Result};
use dist_executor::handler::Handler;
use dist_executor::types::{ExecutionResult, JobStats};
use dist_executor::work::{WorkFuture, WorkSession};

/// What the fake session does when a task is submitted.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Return this result without touching the handler.
    Result(ExecutionResult),
    /// Run the handler the executor resolved, like the controller would.
    RunHandler,
    /// Fail the submission with a dispatch error.
    Fail(String),
}

/// Everything the fake session observed.
#[derive(Debug, Default, Clone)]
pub struct FakeWorkLog {
    pub submitted: Vec<Vec<String>>,
    pub submitted_stats_ids: Vec<String>,
    pub recorded_stats: Vec<JobStats>,
}

/// A fake work session that:
/// - records every submission and stats update
/// - answers submissions with a scripted response.
pub struct FakeWorkSession {
    id: String,
    response: FakeResponse,
    fail_stats_update: bool,
    log: Arc<Mutex<FakeWorkLog>>,
}

impl FakeWorkSession {
    pub fn new(id: &str, response: FakeResponse) -> Self {
        Self {
            id: id.to_string(),
            response,
            fail_stats_update: false,
            log: Arc::new(Mutex::new(FakeWorkLog::default())),
        }
    }

    /// A session without id, i.e. no controller configured.
    pub fn absent() -> Self {
        Self::new("", FakeResponse::Fail("no session".to_string()))
    }

    pub fn failing_stats_update(mut self) -> Self {
        self.fail_stats_update = true;
        self
    }

    pub fn log_handle(&self) -> Arc<Mutex<FakeWorkLog>> {
        Arc::clone(&self.log)
    }
}

impl WorkSession for FakeWorkSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn execute_local_task<'a>(
        &'a self,
        args: &'a [String],
        stats: &'a mut JobStats,
        handler: &'a dyn Handler,
    ) -> WorkFuture<'a, ExecutionResult> {
        Box::pin(async move {
            {
                let mut log = self.log.lock().unwrap();
                log.submitted.push(args.to_vec());
                log.submitted_stats_ids.push(stats.id.clone());
            }

            match &self.response {
                FakeResponse::Result(r) => Ok(r.clone()),
                FakeResponse::RunHandler => handler.execute(args, stats).await,
                FakeResponse::Fail(msg) => Err(ExecutorError::Controller {
                    endpoint: "slots/local/occupy".to_string(),
                    code: 1,
                    message: msg.clone(),
                }),
            }
        })
    }

    fn update_job_stats<'a>(&'a self, stats: &'a JobStats) -> WorkFuture<'a, ()> {
        Box::pin(async move {
            self.log.lock().unwrap().recorded_stats.push(stats.clone());
            if self.fail_stats_update {
                return Err(ExecutorError::Controller {
                    endpoint: "job/stats".to_string(),
                    code: 1,
                    message: "stats rejected".to_string(),
                });
            }
            Ok(())
        })
    }
}
