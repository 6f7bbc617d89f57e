// src/exec/sandbox.rs

//! Runs one command as a native child process.
//!
//! "Sandbox" names intent, isolating one command's execution; it is not a
//! security boundary. No retries happen here.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{ExecutorError, Result};
use crate::types::ExecutionResult;

/// Exit code reported when a process could not even be started.
pub const SPAWN_FAILED_EXIT_CODE: i32 = -1;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Child writes straight to our stdout/stderr; nothing is captured.
    #[default]
    Inherit,
    /// Child output is collected into the [`ExecutionResult`].
    Capture,
}

#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    stdio: StdioMode,
    dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl Sandbox {
    pub fn new(stdio: StdioMode) -> Self {
        Self {
            stdio,
            ..Self::default()
        }
    }

    pub fn inherit() -> Self {
        Self::new(StdioMode::Inherit)
    }

    pub fn capture() -> Self {
        Self::new(StdioMode::Capture)
    }

    /// Run the child in `dir` instead of the current directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Set an extra environment variable for the child.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn stdio(&self) -> StdioMode {
        self.stdio
    }

    /// Spawn `program` with `args`, wait for it and report its exit code.
    ///
    /// A non-zero exit is a normal `Ok` result; only failing to start or
    /// wait for the child is an error.
    pub async fn exec_command(&self, program: &str, args: &[String]) -> Result<ExecutionResult> {
        debug!(program, ?args, stdio = ?self.stdio, "spawning child process");

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::inherit());

        if let Some(ref dir) = self.dir {
            cmd.current_dir(dir);
        }
        cmd.envs(&self.env);

        match self.stdio {
            StdioMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            StdioMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        let mut child = cmd.spawn().map_err(|source| ExecutorError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes concurrently with the wait so neither fills up.
        let (status, stdout, stderr) =
            tokio::try_join!(child.wait(), read_all(stdout), read_all(stderr))
                .with_context(|| format!("waiting for process '{program}'"))?;

        let exit_code = exit_code_of(status);
        info!(program, exit_code, "child process exited");

        Ok(ExecutionResult {
            stdout,
            stderr,
            exit_code,
        })
    }
}

async fn read_all<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Exit code as a shell would report it: the process's own code, or
/// `128 + signo` when it was killed by a signal.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signo) = status.signal() {
            return 128 + signo;
        }
    }

    SPAWN_FAILED_EXIT_CODE
}
