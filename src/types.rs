//! Core value types shared by the walker, the writer and the aggregator.

use serde::Deserialize;
use std::path::PathBuf;

/// What to do when a matched file cannot be read or decoded.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Stop the run at the first failure (output is left truncated).
    #[default]
    Abort,
    /// Log a warning, leave the file out and keep going.
    Skip,
}

/// One file a run would combine, with the label its header carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub header: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub blocks: usize,
    pub bytes: u64,
    /// Files left out under `ReadErrorPolicy::Skip`.
    pub skipped: Vec<PathBuf>,
}
