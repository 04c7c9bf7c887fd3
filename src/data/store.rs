//! Snapshot store: the current device list and the transition baseline.

use super::device::{Device, DeviceId, DeviceStatus};
use super::transition::{baseline_of, detect_transitions, Baseline, Transition};
use super::view::Kpis;

/// Holds the latest device snapshot and the status of each device as of
/// the previous successful fetch.
///
/// Mutated only from the session loop, so no locking is involved.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    devices: Vec<Device>,
    baseline: Baseline,
    revision: u64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current device list in source order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Incremented every time the rendered data changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Last known status of a device, `None` if it has never been seen.
    pub fn prior_status_of(&self, id: DeviceId) -> Option<DeviceStatus> {
        self.baseline.get(&id).copied()
    }

    /// Swap in a new device list and return the old one.
    pub fn replace(&mut self, devices: Vec<Device>) -> Vec<Device> {
        self.revision += 1;
        std::mem::replace(&mut self.devices, devices)
    }

    /// Apply a freshly fetched snapshot.
    ///
    /// Transitions are computed against the baseline as it was before this
    /// call; the baseline is then rebuilt from `devices`.
    pub fn commit(&mut self, devices: Vec<Device>) -> Vec<Transition> {
        let transitions = detect_transitions(&self.baseline, &devices);
        self.baseline = baseline_of(&devices);
        self.replace(devices);
        transitions
    }

    /// Overwrite the latency of one device. No-op for unknown ids.
    ///
    /// Returns whether a device was patched.
    pub fn patch_latency(&mut self, id: DeviceId, latency: i64) -> bool {
        match self.devices.iter_mut().find(|d| d.id == id) {
            Some(device) => {
                device.latency = latency;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Counters over the full, unfiltered list.
    pub fn kpis(&self) -> Kpis {
        Kpis::of(&self.devices)
    }
}
