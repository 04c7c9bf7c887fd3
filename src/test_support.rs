//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::data::{Device, DeviceId, DeviceStatus, DeviceType, PingReply};
use crate::error::SourceError;
use crate::source::DeviceSource;

/// Build a device. Up devices get 10ms latency, Down devices time out.
pub fn device(id: u64, name: &str, ip: &str, status: DeviceStatus) -> Device {
    let changed = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
    let checked = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    Device {
        id: DeviceId(id),
        name: name.to_string(),
        ip_address: ip.to_string(),
        device_type: DeviceType::Router,
        location: Some("Lab".to_string()),
        status,
        status_changed_at: changed,
        latency: if status == DeviceStatus::Up { 10 } else { -1 },
        last_checked: checked,
    }
}

/// A device source that replays scripted responses.
///
/// Fetch responses may carry a delay so tests can make requests resolve out
/// of order (use with a paused tokio clock).
#[derive(Debug, Default)]
pub struct FakeSource {
    fetches: Mutex<VecDeque<(Duration, Result<Vec<Device>, SourceError>)>>,
    pings: Mutex<VecDeque<Result<PingReply, SourceError>>>,
    fetch_calls: Mutex<usize>,
    ping_calls: Mutex<Vec<DeviceId>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fetch(&self, result: Result<Vec<Device>, SourceError>) {
        self.push_delayed_fetch(Duration::ZERO, result);
    }

    pub fn push_delayed_fetch(&self, delay: Duration, result: Result<Vec<Device>, SourceError>) {
        self.fetches.lock().unwrap().push_back((delay, result));
    }

    pub fn push_ping(&self, result: Result<PingReply, SourceError>) {
        self.pings.lock().unwrap().push_back(result);
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.lock().unwrap()
    }

    pub fn ping_calls(&self) -> Vec<DeviceId> {
        self.ping_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceSource for FakeSource {
    async fn fetch_devices(&self) -> Result<Vec<Device>, SourceError> {
        *self.fetch_calls.lock().unwrap() += 1;
        let next = self.fetches.lock().unwrap().pop_front();
        let Some((delay, result)) = next else {
            return Err(SourceError::Connection("no scripted response".to_string()));
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn ping(&self, id: DeviceId) -> Result<PingReply, SourceError> {
        self.ping_calls.lock().unwrap().push(id);
        let next = self.pings.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(SourceError::Connection("no scripted response".to_string())))
    }

    fn description(&self) -> &str {
        "fake"
    }
}
