//! Status transition detection between consecutive snapshots.

use std::collections::HashMap;

use super::device::{Device, DeviceId, DeviceStatus};

/// Status of every device as of the previous successful fetch.
pub type Baseline = HashMap<DeviceId, DeviceStatus>;

/// A status change observed between two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub device_id: DeviceId,
    pub name: String,
    pub from: DeviceStatus,
    pub to: DeviceStatus,
}

impl Transition {
    /// Only a device going from Up to Down warrants a user notification.
    pub fn is_alert(&self) -> bool {
        self.from == DeviceStatus::Up && self.to == DeviceStatus::Down
    }
}

/// Compare a new device list against the baseline.
///
/// Devices missing from the baseline have no known prior status and never
/// produce an event. Events follow the order of `devices`.
pub fn detect_transitions(baseline: &Baseline, devices: &[Device]) -> Vec<Transition> {
    devices
        .iter()
        .filter_map(|device| {
            let from = *baseline.get(&device.id)?;
            (from != device.status).then(|| Transition {
                device_id: device.id,
                name: device.name.clone(),
                from,
                to: device.status,
            })
        })
        .collect()
}

/// The first alert-worthy transition, if any.
pub fn first_alert(transitions: &[Transition]) -> Option<&Transition> {
    transitions.iter().find(|t| t.is_alert())
}

/// Build a fresh baseline from a device list.
pub fn baseline_of(devices: &[Device]) -> Baseline {
    devices.iter().map(|d| (d.id, d.status)).collect()
}
