//! Error types for aggregation runs and configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort (or, in skip mode, downgrade) an aggregation run.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("cannot create output file {path}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write to output file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Decode { path: PathBuf },
}

impl AggregationError {
    /// True for per-file input failures, the only kind skip mode may swallow.
    pub fn is_input_failure(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Decode { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),

    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot resolve root directory {path}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
