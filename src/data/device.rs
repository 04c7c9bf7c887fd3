//! Device model as served by the device list endpoint.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, stable device identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reachability status reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    Up,
    Down,
}

impl DeviceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Up => "Up",
            DeviceStatus::Down => "Down",
        }
    }
}

/// Device category. Only used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Router,
    Switch,
    Firewall,
    /// Any category this client does not know about.
    #[serde(other)]
    Other,
}

impl DeviceType {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Router => "Router",
            DeviceType::Switch => "Switch",
            DeviceType::Firewall => "Firewall",
            DeviceType::Other => "Other",
        }
    }
}

/// A monitored network device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub ip_address: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub location: Option<String>,
    pub status: DeviceStatus,
    pub status_changed_at: DateTime<Utc>,
    /// Round-trip time in milliseconds; negative means timeout.
    pub latency: i64,
    pub last_checked: DateTime<Utc>,
}

impl Device {
    pub fn is_down(&self) -> bool {
        self.status == DeviceStatus::Down
    }

    /// Latency in milliseconds, or `None` if the last check timed out.
    pub fn latency_ms(&self) -> Option<u64> {
        u64::try_from(self.latency).ok()
    }
}

/// Body returned by the probe endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingReply {
    pub ok: bool,
    #[serde(default)]
    pub rtt_ms: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_device_list() {
        let json = r#"[
            {
                "id": 1,
                "name": "Router1 ",
                "ip_address": "192.168.1.1",
                "status": "Up",
                "type": "Router",
                "last_checked": "2025-03-01T10:00:00.123456+00:00",
                "location": "London",
                "latency": 42,
                "status_changed_at": "2025-02-28T10:00:00+00:00"
            },
            {
                "id": 8,
                "name": "Firewall - 7",
                "ip_address": "172.16.0.1",
                "status": "Down",
                "type": "Firewall",
                "last_checked": "2025-03-01T09:00:00+00:00",
                "latency": -1,
                "status_changed_at": "2025-02-27T10:00:00+00:00"
            }
        ]"#;

        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, DeviceId(1));
        assert_eq!(devices[0].device_type, DeviceType::Router);
        assert_eq!(devices[0].location.as_deref(), Some("London"));
        assert_eq!(devices[0].latency_ms(), Some(42));
        assert!(devices[1].is_down());
        assert!(devices[1].location.is_none());
        assert_eq!(devices[1].latency_ms(), None);
    }

    #[test]
    fn test_unknown_type_is_other() {
        let json = r#"{
            "id": 3, "name": "ap", "ip_address": "10.0.0.3", "status": "Up",
            "type": "AccessPoint", "latency": 3,
            "last_checked": "2025-03-01T10:00:00Z",
            "status_changed_at": "2025-03-01T10:00:00Z"
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.device_type, DeviceType::Other);
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let json = r#"{
            "id": 3, "name": "x", "ip_address": "10.0.0.3", "status": "Flapping",
            "type": "Switch", "latency": 3,
            "last_checked": "2025-03-01T10:00:00Z",
            "status_changed_at": "2025-03-01T10:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Device>(json).is_err());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let json = r#"{
            "id": "r1", "name": "x", "ip_address": "10.0.0.3", "status": "Up",
            "type": "Switch", "latency": 3,
            "last_checked": "2025-03-01T10:00:00Z",
            "status_changed_at": "2025-03-01T10:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Device>(json).is_err());
    }

    #[test]
    fn test_ping_reply_without_rtt() {
        let reply: PingReply = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        assert!(!reply.ok);
        assert!(reply.rtt_ms.is_none());
    }
}
