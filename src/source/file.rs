//! File-based data source.
//!
//! Reads the device list from a JSON file, for offline use.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::DeviceSource;
use crate::data::{Device, DeviceId, PingReply};
use crate::error::SourceError;

/// A data source that reads the device list from a JSON file.
///
/// The file holds the same JSON array the device list endpoint returns and
/// is re-read on every fetch. Probing needs a live prober, so `ping` always
/// fails with [`SourceError::Unsupported`].
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeviceSource for FileSource {
    async fn fetch_devices(&self) -> Result<Vec<Device>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn ping(&self, _id: DeviceId) -> Result<PingReply, SourceError> {
        Err(SourceError::Unsupported("probing requires the dashboard API".to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}
