// src/work/controller.rs

//! HTTP client for the controller's work API.
//!
//! Every endpoint lives under `/api/v1/dist/work/{work_id}/` and answers with
//! the envelope `{"result": bool, "code": int, "message": str, "data": any}`.
//!
//! A local task runs in three steps:
//! 1. `POST slots/local/occupy`: the controller holds the request until a
//!    local execution slot is free, capping concurrent local work per host.
//! 2. The handler executes the command.
//! 3. `POST slots/local/free`: hand the slot back, also after a failure.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ControllerConfig;
use crate::errors::{ExecutorError, Result};
use crate::handler::Handler;
use crate::types::{ExecutionResult, JobStats};
use crate::work::{WorkFuture, WorkSession};

const API_PREFIX: &str = "api/v1/dist/work";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: bool,
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct SlotRequest<'a> {
    usage: &'a str,
    weight: u32,
}

/// Work session backed by the controller service.
#[derive(Debug, Clone)]
pub struct ControllerWork {
    client: reqwest::Client,
    base_url: String,
    work_id: String,
}

impl ControllerWork {
    pub fn new(config: &ControllerConfig, work_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            work_id: work_id.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}/{}/{path}", self.base_url, self.work_id)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.endpoint(path);
        debug!(%url, "controller request");

        let resp: ApiResponse = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !resp.result {
            return Err(ExecutorError::Controller {
                endpoint: path.to_string(),
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(())
    }

    async fn run_local_task(
        &self,
        args: &[String],
        stats: &mut JobStats,
        handler: &dyn Handler,
    ) -> Result<ExecutionResult> {
        let slot = SlotRequest {
            usage: &stats.booster_type,
            weight: 1,
        };
        self.post("slots/local/occupy", &slot).await?;

        let outcome = handler.execute(args, stats).await;

        let slot = SlotRequest {
            usage: &stats.booster_type,
            weight: 1,
        };
        if let Err(e) = self.post("slots/local/free", &slot).await {
            warn!(work_id = %self.work_id, error = %e, "failed to free local slot");
        }

        outcome
    }
}

impl WorkSession for ControllerWork {
    fn id(&self) -> &str {
        &self.work_id
    }

    fn execute_local_task<'a>(
        &'a self,
        args: &'a [String],
        stats: &'a mut JobStats,
        handler: &'a dyn Handler,
    ) -> WorkFuture<'a, ExecutionResult> {
        Box::pin(self.run_local_task(args, stats, handler))
    }

    fn update_job_stats<'a>(&'a self, stats: &'a JobStats) -> WorkFuture<'a, ()> {
        Box::pin(self.post("job/stats", stats))
    }
}
