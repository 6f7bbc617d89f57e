// src/handler/mod.rs

//! Build-type-specific handlers.
//!
//! A [`Handler`] takes one invocation's command line plus the job's
//! statistics and produces an [`ExecutionResult`]. Which handler runs is
//! decided by the fixed table in [`registry`].
//!
//! - [`sandbox_handler`] runs the command as a captured child process; it
//!   backs every real tool type.
//! - [`echo`] is the test handler: it echoes its arguments without spawning
//!   anything.

pub mod echo;
pub mod registry;
pub mod sandbox_handler;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::{BuildType, ExecutionResult, JobStats};

pub use echo::EchoHandler;
pub use registry::{get_handler, registered_types};
pub use sandbox_handler::SandboxHandler;

/// Boxed future returned by [`Handler::execute`].
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;

/// Prepares and executes one build-type-specific task.
pub trait Handler: Send + Sync {
    fn build_type(&self) -> BuildType;

    /// Execute `args` (argv without the executor's own name), annotating
    /// `stats` along the way.
    fn execute<'a>(&'a self, args: &'a [String], stats: &'a mut JobStats) -> HandlerFuture<'a>;
}
