//! Device data model and the pure reconciliation/presentation logic.
//!
//! ## Submodules
//!
//! - [`device`]: The wire model ([`Device`], [`DeviceStatus`], [`PingReply`])
//! - [`store`]: [`SnapshotStore`] holding the current snapshot and baseline
//! - [`transition`]: Status transition detection between snapshots
//! - [`view`]: Filtering, searching and ordering for display
//! - [`format`]: Latency and age formatting
//!
//! ## Data Flow
//!
//! ```text
//! Vec<Device> (fetched JSON)
//!        │
//!        ▼
//! SnapshotStore::commit()
//!        │
//!        ├──▶ detect_transitions(baseline, devices)  (before overwrite)
//!        │
//!        └──▶ devices + rebuilt baseline
//!                    │
//!                    ▼
//!        project(devices, search, filter) ──▶ Projection (display order)
//! ```

pub mod device;
pub mod format;
pub mod store;
pub mod transition;
pub mod view;

pub use device::{Device, DeviceId, DeviceStatus, DeviceType, PingReply};
pub use store::SnapshotStore;
pub use transition::{detect_transitions, first_alert, Baseline, Transition};
pub use view::{project, Kpis, Projection, StatusFilter};
