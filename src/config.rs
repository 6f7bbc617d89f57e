// src/config.rs

//! Environment-derived configuration.
//!
//! Every knob lives in a `BK_DIST_*` environment variable set by the
//! controller when it launches a build. [`ExecutorConfig::from_lookup`] takes
//! any key → value function so tests never touch the process environment.

use std::time::Duration;

use crate::errors::{ExecutorError, Result};
use crate::logging::LogLevel;
use crate::types::BuildType;

pub const ENV_PREFIX: &str = "BK_DIST_";

pub const KEY_BOOSTER_TYPE: &str = "BOOSTER_TYPE";
pub const KEY_WORK_ID: &str = "EXECUTOR_CONTROLLER_WORK_ID";
pub const KEY_TASK_ID: &str = "EXECUTOR_TASK_ID";
pub const KEY_LOG_LEVEL: &str = "EXECUTOR_LOG_LEVEL";
pub const KEY_CONTROLLER_SCHEME: &str = "CONTROLLER_SCHEME";
pub const KEY_CONTROLLER_IP: &str = "CONTROLLER_IP";
pub const KEY_CONTROLLER_PORT: &str = "CONTROLLER_PORT";
pub const KEY_CONTROLLER_TIMEOUT: &str = "CONTROLLER_TIMEOUT_SECS";

pub const DEFAULT_CONTROLLER_SCHEME: &str = "http";
pub const DEFAULT_CONTROLLER_IP: &str = "127.0.0.1";
pub const DEFAULT_CONTROLLER_PORT: u16 = 30117;
pub const DEFAULT_CONTROLLER_TIMEOUT: Duration = Duration::from_secs(600);

/// Full environment variable name for a key, e.g. `BK_DIST_BOOSTER_TYPE`.
pub fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{key}")
}

/// Where the controller listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub scheme: String,
    pub ip: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_CONTROLLER_SCHEME.to_string(),
            ip: DEFAULT_CONTROLLER_IP.to_string(),
            port: DEFAULT_CONTROLLER_PORT,
            timeout: DEFAULT_CONTROLLER_TIMEOUT,
        }
    }
}

impl ControllerConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.ip, self.port)
    }
}

/// Controller settings exactly as found in the environment.
///
/// Nothing here is validated until [`ControllerEnv::resolve`] is called,
/// which only happens once a work session needs the controller. A stale or
/// malformed value never affects direct runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerEnv {
    pub scheme: Option<String>,
    pub ip: Option<String>,
    pub port: Option<String>,
    pub timeout_secs: Option<String>,
}

impl ControllerEnv {
    /// Validate the raw values into a [`ControllerConfig`], filling defaults.
    pub fn resolve(&self) -> Result<ControllerConfig> {
        let mut controller = ControllerConfig::default();
        if let Some(scheme) = &self.scheme {
            controller.scheme = scheme.clone();
        }
        if let Some(ip) = &self.ip {
            controller.ip = ip.clone();
        }
        if let Some(port) = &self.port {
            controller.port = port.parse().map_err(|_| {
                ExecutorError::ConfigError(format!(
                    "{} must be a port number, got {port:?}",
                    env_key(KEY_CONTROLLER_PORT)
                ))
            })?;
        }
        if let Some(secs) = &self.timeout_secs {
            let secs: u64 = secs.parse().map_err(|_| {
                ExecutorError::ConfigError(format!(
                    "{} must be a number of seconds, got {secs:?}",
                    env_key(KEY_CONTROLLER_TIMEOUT)
                ))
            })?;
            controller.timeout = Duration::from_secs(secs);
        }
        Ok(controller)
    }
}

/// Everything the executor reads from its environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub build_type: BuildType,
    /// Controller work session id; empty means run directly.
    pub work_id: String,
    pub task_id: String,
    pub log_level: LogLevel,
    pub controller: ControllerEnv,
}

impl ExecutorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary lookup of full variable names.
    ///
    /// Never fails: unknown log levels mean silent, unknown build types are
    /// kept for the registry to reject, and controller values are validated
    /// later by [`ControllerEnv::resolve`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&env_key(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            build_type: get(KEY_BOOSTER_TYPE)
                .map(|v| BuildType::from(v.as_str()))
                .unwrap_or_default(),
            work_id: get(KEY_WORK_ID).unwrap_or_default(),
            task_id: get(KEY_TASK_ID).unwrap_or_default(),
            log_level: LogLevel::from_token(get(KEY_LOG_LEVEL).as_deref()),
            controller: ControllerEnv {
                scheme: get(KEY_CONTROLLER_SCHEME),
                ip: get(KEY_CONTROLLER_IP),
                port: get(KEY_CONTROLLER_PORT),
                timeout_secs: get(KEY_CONTROLLER_TIMEOUT),
            },
        }
    }
}
