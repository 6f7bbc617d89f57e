// src/exec/signals.rs

//! Termination-signal watcher.
//!
//! The watcher waits for exactly one termination signal and then ends the
//! whole process through its callback. It never touches executor state and
//! does not unwind in-flight children or network calls; the OS reclaims them
//! when the process exits.

use std::fmt;

use tokio::task::JoinHandle;
use tracing::warn;

/// A termination signal the watcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Any other handled signal (e.g. Ctrl-Break on Windows).
    Other,
}

impl TerminationSignal {
    /// Exit code the process ends with: 128 + signo for SIGINT/SIGTERM.
    pub fn exit_code(self) -> i32 {
        match self {
            TerminationSignal::Interrupt => 130,
            TerminationSignal::Terminate => 143,
            TerminationSignal::Other => 1,
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminationSignal::Interrupt => "interrupt",
            TerminationSignal::Terminate => "terminated",
            TerminationSignal::Other => "other",
        };
        f.write_str(name)
    }
}

/// Install the signal handlers and spawn the watcher task.
///
/// Handlers are registered before this function returns, so a signal that
/// arrives right after the call is still observed. On the first signal the
/// watcher calls `on_signal` with the exit code from
/// [`TerminationSignal::exit_code`]; production passes
/// [`std::process::exit`].
///
/// Must be called from within a Tokio runtime.
pub fn spawn_signal_watcher<F>(on_signal: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce(i32) + Send + 'static,
{
    let mut listener = SignalListener::install()?;

    Ok(tokio::spawn(async move {
        if let Some(sig) = listener.recv().await {
            warn!(signal = %sig, "received termination signal, exiting");
            on_signal(sig.exit_code());
        }
    }))
}

#[cfg(unix)]
struct SignalListener {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some(TerminationSignal::Interrupt),
            Some(()) = self.terminate.recv() => Some(TerminationSignal::Terminate),
            else => None,
        }
    }
}

#[cfg(windows)]
struct SignalListener {
    ctrl_c: tokio::signal::windows::CtrlC,
    ctrl_break: tokio::signal::windows::CtrlBreak,
}

#[cfg(windows)]
impl SignalListener {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
            ctrl_break: tokio::signal::windows::ctrl_break()?,
        })
    }

    async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::select! {
            Some(()) = self.ctrl_c.recv() => Some(TerminationSignal::Interrupt),
            Some(()) = self.ctrl_break.recv() => Some(TerminationSignal::Other),
            else => None,
        }
    }
}
