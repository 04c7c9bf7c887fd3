//! On-demand probe of the selected device.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::data::{Device, DeviceId, PingReply, SnapshotStore};
use crate::error::SourceError;
use crate::poller::Update;
use crate::source::DeviceSource;

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The device answered; round-trip time in milliseconds.
    Reachable { rtt_ms: i64 },
    /// The prober ran but the device did not answer.
    Timeout,
    /// The probe request itself failed.
    Failed(String),
}

impl ProbeOutcome {
    pub fn from_reply(result: Result<PingReply, SourceError>) -> Self {
        match result {
            Ok(PingReply {
                ok: true,
                rtt_ms: Some(rtt_ms),
            }) if rtt_ms >= 0 => ProbeOutcome::Reachable { rtt_ms },
            Ok(PingReply { ok: true, .. }) => {
                ProbeOutcome::Failed("response carried no round-trip time".to_string())
            }
            Ok(PingReply { ok: false, .. }) => ProbeOutcome::Timeout,
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }

    /// Notification text for this outcome.
    pub fn message(&self, name: &str) -> String {
        match self {
            ProbeOutcome::Reachable { rtt_ms } => format!("Ping {}: {}ms", name, rtt_ms),
            ProbeOutcome::Timeout => format!("Ping {}: timeout", name),
            ProbeOutcome::Failed(reason) => format!("Ping failed: {}", reason),
        }
    }
}

/// Run one probe against a device.
pub async fn probe(source: &dyn DeviceSource, id: DeviceId) -> ProbeOutcome {
    ProbeOutcome::from_reply(source.ping(id).await)
}

/// Starts probes in the background and applies their results.
#[derive(Debug)]
pub struct ProbeInitiator {
    source: Arc<dyn DeviceSource>,
    updates: mpsc::UnboundedSender<Update>,
}

impl ProbeInitiator {
    pub fn new(source: Arc<dyn DeviceSource>, updates: mpsc::UnboundedSender<Update>) -> Self {
        Self { source, updates }
    }

    /// Probe the selected device. Without a selection nothing is sent.
    ///
    /// Returns whether a request was started.
    pub fn start(&self, selected: Option<&Device>) -> bool {
        let Some(device) = selected else {
            debug!("Probe requested with no device selected");
            return false;
        };

        let device_id = device.id;
        let name = device.name.clone();
        let source = self.source.clone();
        let updates = self.updates.clone();
        debug!(%device_id, "Starting probe");

        tokio::spawn(async move {
            let outcome = probe(source.as_ref(), device_id).await;
            let _ = updates.send(Update::Probed {
                device_id,
                name,
                outcome,
            });
        });
        true
    }

    /// Apply a finished probe and return the notification text.
    ///
    /// Only a successful probe touches the store, and only the latency.
    pub fn apply(
        store: &mut SnapshotStore,
        device_id: DeviceId,
        name: &str,
        outcome: &ProbeOutcome,
    ) -> String {
        if let ProbeOutcome::Reachable { rtt_ms } = outcome {
            store.patch_latency(device_id, *rtt_ms);
        }
        info!(%device_id, ?outcome, "Probe finished");
        outcome.message(name)
    }
}
