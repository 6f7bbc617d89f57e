// src/handler/sandbox_handler.rs

use chrono::Utc;
use tracing::debug;

use crate::errors::{ExecutorError, Result};
use crate::exec::Sandbox;
use crate::handler::{Handler, HandlerFuture};
use crate::types::{BuildType, JobStats};

/// Runs the invocation as a captured local child process.
pub struct SandboxHandler {
    build_type: BuildType,
    sandbox: Sandbox,
}

impl SandboxHandler {
    pub fn new(build_type: BuildType) -> Self {
        Self {
            build_type,
            sandbox: Sandbox::capture(),
        }
    }

    pub fn with_sandbox(build_type: BuildType, sandbox: Sandbox) -> Self {
        Self {
            build_type,
            sandbox,
        }
    }
}

impl Handler for SandboxHandler {
    fn build_type(&self) -> BuildType {
        self.build_type.clone()
    }

    fn execute<'a>(&'a self, args: &'a [String], stats: &'a mut JobStats) -> HandlerFuture<'a> {
        Box::pin(async move {
            let (program, rest) = args.split_first().ok_or(ExecutorError::NotEnoughArgs)?;

            debug!(build_type = %self.build_type, program = %program, "executing task locally");

            stats.local = true;
            stats.local_exec_start_time = Some(Utc::now());
            let outcome = self.sandbox.exec_command(program, rest).await;
            stats.local_exec_end_time = Some(Utc::now());

            let result = outcome?;
            stats.exit_code = result.exit_code;
            stats.success = result.success();
            Ok(result)
        })
    }
}

pub(crate) fn new_cc() -> Result<Box<dyn Handler>> {
    Ok(Box::new(SandboxHandler::new(BuildType::Cc)))
}

pub(crate) fn new_finder() -> Result<Box<dyn Handler>> {
    Ok(Box::new(SandboxHandler::new(BuildType::Find)))
}

pub(crate) fn new_texture_compressor() -> Result<Box<dyn Handler>> {
    Ok(Box::new(SandboxHandler::new(BuildType::Tc)))
}

pub(crate) fn new_ue4() -> Result<Box<dyn Handler>> {
    Ok(Box::new(SandboxHandler::new(BuildType::Ue4)))
}

pub(crate) fn new_custom() -> Result<Box<dyn Handler>> {
    Ok(Box::new(SandboxHandler::new(BuildType::Custom)))
}
