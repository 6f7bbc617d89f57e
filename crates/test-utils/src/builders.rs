#![allow(dead_code)]

use std::collections::HashMap;

use dist_executor::config::{env_key, ExecutorConfig};
use dist_executor::logging::LogLevel;
use dist_executor::types::BuildType;

/// Builder for `ExecutorConfig` to simplify test setup.
pub struct ExecutorConfigBuilder {
    config: ExecutorConfig,
}

impl ExecutorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ExecutorConfig::default(),
        }
    }

    pub fn work_id(mut self, id: &str) -> Self {
        self.config.work_id = id.to_string();
        self
    }

    pub fn task_id(mut self, id: &str) -> Self {
        self.config.task_id = id.to_string();
        self
    }

    pub fn build_type(mut self, build_type: BuildType) -> Self {
        self.config.build_type = build_type;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn build(self) -> ExecutorConfig {
        self.config
    }
}

impl Default for ExecutorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory stand-in for the process environment.
#[derive(Debug, Default, Clone)]
pub struct FakeEnv {
    vars: HashMap<String, String>,
}

impl FakeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `BK_DIST_{key}`.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(env_key(key), value.to_string());
        self
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
