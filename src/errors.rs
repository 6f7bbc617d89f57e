// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::BuildType;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("not enough args to execute")]
    NotEnoughArgs,

    #[error("unknown handler {0}")]
    UnknownHandler(BuildType),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("controller rejected request to {endpoint}: code {code}, {message}")]
    Controller {
        endpoint: String,
        code: i32,
        message: String,
    },

    #[error("controller request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no controller work session")]
    NoWorkSession,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
