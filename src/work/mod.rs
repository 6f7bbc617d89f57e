// src/work/mod.rs

//! Controller work session boundary.
//!
//! The executor talks to a [`WorkSession`] instead of the controller
//! directly. Production code uses [`ControllerWork`], an HTTP client for the
//! controller's work API; tests provide their own implementation that
//! returns scripted results.

pub mod controller;

use std::future::Future;
use std::pin::Pin;

use crate::errors::{ExecutorError, Result};
use crate::handler::Handler;
use crate::types::{ExecutionResult, JobStats};

pub use controller::ControllerWork;

/// Boxed future returned by [`WorkSession`] operations.
pub type WorkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// A named unit of coordinated work on the controller.
pub trait WorkSession: Send + Sync {
    /// Session id; empty when no controller session is configured.
    fn id(&self) -> &str;

    /// Execute `args` as a local task of this session.
    ///
    /// `stats` travels with the job so the session and the handler can
    /// annotate it.
    fn execute_local_task<'a>(
        &'a self,
        args: &'a [String],
        stats: &'a mut JobStats,
        handler: &'a dyn Handler,
    ) -> WorkFuture<'a, ExecutionResult>;

    /// Report the final statistics of one job.
    fn update_job_stats<'a>(&'a self, stats: &'a JobStats) -> WorkFuture<'a, ()>;
}

/// Session used when no controller work id is configured.
///
/// Its id is empty, so the executor runs in direct mode and never submits
/// anything to it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl WorkSession for NoSession {
    fn id(&self) -> &str {
        ""
    }

    fn execute_local_task<'a>(
        &'a self,
        _args: &'a [String],
        _stats: &'a mut JobStats,
        _handler: &'a dyn Handler,
    ) -> WorkFuture<'a, ExecutionResult> {
        Box::pin(async { Err(ExecutorError::NoWorkSession) })
    }

    fn update_job_stats<'a>(&'a self, _stats: &'a JobStats) -> WorkFuture<'a, ()> {
        Box::pin(async { Err(ExecutorError::NoWorkSession) })
    }
}
