// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`sandbox`] runs a single command as a child process, either with
//!   inherited standard streams (direct mode) or with captured output
//!   (handlers).
//! - [`signals`] owns the termination-signal watcher and the exit code
//!   convention for signals.

pub mod sandbox;
pub mod signals;

pub use sandbox::{Sandbox, StdioMode, SPAWN_FAILED_EXIT_CODE};
pub use signals::{spawn_signal_watcher, TerminationSignal};
