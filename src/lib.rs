// src/lib.rs

pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod executor;
pub mod handler;
pub mod logging;
pub mod types;
pub mod work;

use std::io;

use tracing::warn;

use crate::config::ExecutorConfig;
use crate::exec::{spawn_signal_watcher, SPAWN_FAILED_EXIT_CODE};
use crate::logging::init_logging;
use crate::types::Invocation;
use crate::work::{ControllerWork, NoSession};

pub use crate::errors::{ExecutorError, Result};
pub use crate::executor::{DistExecutor, ExecutionMode, RunOutcome};

/// High-level entry point used by `main.rs`.
///
/// Reads the `BK_DIST_*` environment and this process's argv; a signal ends
/// the process with 130/143/1 via `std::process::exit`.
pub async fn run() -> RunOutcome {
    run_with(ExecutorConfig::from_env(), Invocation::from_env(), |code| {
        std::process::exit(code)
    })
    .await
}

/// [`run`] with explicit configuration, argv and signal callback.
///
/// Order matters here:
/// 1. logging and the signal watcher are installed before anything else;
/// 2. an empty work id runs the tool directly, without ever looking at the
///    controller settings;
/// 3. otherwise the controller settings are validated and the HTTP session
///    is built, and the invocation goes through it.
pub async fn run_with<F>(config: ExecutorConfig, invocation: Invocation, on_signal: F) -> RunOutcome
where
    F: FnOnce(i32) + Send + 'static,
{
    init_logging(config.log_level);

    if let Err(e) = spawn_signal_watcher(on_signal) {
        warn!(error = %e, "failed to install signal handlers");
    }

    let (mut out, mut err) = (io::stdout(), io::stderr());

    if config.work_id.is_empty() {
        let mut executor = DistExecutor::new(config, NoSession, invocation);
        return executor.execute(&mut out, &mut err).await;
    }

    let work = match connect(&config) {
        Ok(w) => w,
        Err(e) => return RunOutcome::failed(SPAWN_FAILED_EXIT_CODE, e),
    };

    let mut executor = DistExecutor::new(config, work, invocation);
    executor.execute(&mut out, &mut err).await
}

fn connect(config: &ExecutorConfig) -> Result<ControllerWork> {
    let controller = config.controller.resolve()?;
    ControllerWork::new(&controller, config.work_id.clone())
}
