use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{error, info};

use crate::error::{ReportError, ReportResult};

/// Somewhere rendered reports are written to.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Stores `contents` under `name` and returns where it ended up.
    async fn persist(&self, name: &str, contents: &[u8]) -> ReportResult<PathBuf>;
}

/// Writes each report as a file inside one directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportSink for FileSink {
    async fn persist(&self, name: &str, contents: &[u8]) -> ReportResult<PathBuf> {
        let path = self.dir.join(name);
        info!("Writing {} bytes to {}", contents.len(), path.display());

        match tokio::fs::write(&path, contents).await {
            Ok(()) => Ok(path),
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                Err(ReportError::Persist { path, source: e })
            }
        }
    }
}
