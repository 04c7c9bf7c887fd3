//! Device source abstraction.
//!
//! This module provides a trait-based abstraction over where device data
//! comes from and where probes are executed: the dashboard HTTP API or a
//! JSON file on disk.

mod file;
mod http;

pub use file::FileSource;
pub use http::{cookie_value, HttpSource, HttpSourceBuilder};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::{Device, DeviceId, PingReply};
use crate::error::SourceError;

/// Trait for fetching device snapshots and running probes.
///
/// Implementations are shared between spawned tasks, so they must be
/// `Send + Sync`. Each call issues exactly one request; nothing is cached.
///
/// # Example
///
/// ```no_run
/// use devwatch::{DeviceSource, HttpSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::builder().base_url("http://127.0.0.1:8000").build().unwrap();
/// let devices = source.fetch_devices().await.unwrap();
/// println!("Got {} devices", devices.len());
/// # });
/// ```
#[async_trait]
pub trait DeviceSource: Send + Sync + Debug {
    /// Fetch the full device list.
    async fn fetch_devices(&self) -> Result<Vec<Device>, SourceError>;

    /// Ask the remote prober to ping one device.
    async fn ping(&self, id: DeviceId) -> Result<PingReply, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
