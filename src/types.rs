use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of the wrapped build tool.
///
/// Parsing never fails: unrecognised tokens are kept in `Unknown` so that the
/// handler registry can name them when it rejects the lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildType {
    /// Compiler distribution (gcc/clang/cl frontends).
    Cc,
    /// File finder.
    Find,
    /// Texture compressor.
    Tc,
    /// Engine build step.
    Ue4,
    /// Test handler that echoes its arguments.
    Echo,
    /// User-provided command line.
    Custom,
    Unknown(String),
}

impl BuildType {
    pub fn as_str(&self) -> &str {
        match self {
            BuildType::Cc => "cc",
            BuildType::Find => "find",
            BuildType::Tc => "tc",
            BuildType::Ue4 => "ue4",
            BuildType::Echo => "echo",
            BuildType::Custom => "custom",
            BuildType::Unknown(token) if token.is_empty() => "unknown",
            BuildType::Unknown(token) => token.as_str(),
        }
    }
}

impl Default for BuildType {
    fn default() -> Self {
        BuildType::Unknown(String::new())
    }
}

impl From<&str> for BuildType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cc" => BuildType::Cc,
            "find" => BuildType::Find,
            "tc" => BuildType::Tc,
            "ue4" => BuildType::Ue4,
            "echo" => BuildType::Echo,
            "custom" => BuildType::Custom,
            _ => BuildType::Unknown(s.trim().to_string()),
        }
    }
}

impl FromStr for BuildType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The argv this process was launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    argv: Vec<String>,
}

impl Invocation {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// Capture the current process arguments. Non-UTF-8 arguments are
    /// converted lossily.
    pub fn from_env() -> Self {
        Self::new(
            std::env::args_os()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        )
    }

    /// argv[0], the name this executable was invoked as.
    pub fn program_name(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// argv[1..]: the command line to execute or distribute.
    pub fn command(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Captured outcome of one command, local or remote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Per-job statistics reported back to the controller once per coordinated
/// run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStats {
    pub pid: u32,
    pub id: String,
    pub work_id: String,
    pub task_id: String,
    pub booster_type: String,
    pub origin_args: Vec<String>,

    pub enter_time: Option<DateTime<Utc>>,
    pub leave_time: Option<DateTime<Utc>>,
    pub local_exec_start_time: Option<DateTime<Utc>>,
    pub local_exec_end_time: Option<DateTime<Utc>>,

    pub exit_code: i32,
    pub success: bool,
    /// Whether the command ran on this machine rather than a remote worker.
    pub local: bool,
}

impl JobStats {
    /// Fresh statistics for one coordinated run.
    ///
    /// The id is `"{pid}_{unix_nanos}"`, unique across invocations at
    /// sub-second resolution.
    pub fn new(
        work_id: &str,
        task_id: &str,
        build_type: &BuildType,
        invocation: &Invocation,
    ) -> Self {
        let now = Utc::now();
        let pid = std::process::id();
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));

        Self {
            pid,
            id: format!("{pid}_{nanos}"),
            work_id: work_id.to_string(),
            task_id: task_id.to_string(),
            booster_type: build_type.to_string(),
            origin_args: invocation.command().to_vec(),
            enter_time: Some(now),
            ..Self::default()
        }
    }
}
