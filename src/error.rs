//! Error type shared by the report pipeline.
//! Each variant names the stage that failed so the binary can report it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("fetch stage failed: {0}")]
    Fetch(String),

    #[error("fetch stage failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("deserialization stage failed: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("render stage failed: {0}")]
    Render(String),

    #[error("persist stage failed for {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;
