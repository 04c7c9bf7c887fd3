//! # devwatch
//!
//! A live status dashboard for monitored network devices.
//!
//! The dashboard pulls the device list from a monitoring server's HTTP API,
//! keeps the latest snapshot, announces devices that just went down, lets
//! the user search and filter the list, and can ping a single device on
//! demand.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │(session)│    │ (store)  │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │ Update ▲                                            │
//! │       ▼        │                                            │
//! │  ┌─────────┐  ┌───────┐                                     │
//! │  │ poller  │  │ probe │  (tokio tasks)                      │
//! │  └────┬────┘  └───┬───┘                                     │
//! │       ▼           ▼                                         │
//! │  ┌──────────────────┐                                       │
//! │  │ source           │◀── HttpSource | FileSource            │
//! │  └──────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Session state; the single [`app::Command`] dispatch point
//! - **[`data`]**: Device model, snapshot store, transition detection, view projection
//! - **[`poller`]**: Manual and recurring fetches, newest response wins
//! - **[`probe`]**: On-demand ping of the selected device
//! - **[`source`]**: Data source abstraction ([`DeviceSource`] trait) over HTTP or a file
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a monitoring server
//! devwatch --url http://127.0.0.1:8000 --auto
//!
//! # Browse a saved device list
//! devwatch --file devices.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use devwatch::{App, AppOptions, Command, HttpSource};
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::builder().base_url("http://127.0.0.1:8000").build().unwrap();
//! let mut app = App::new(Arc::new(source), AppOptions::default());
//! app.dispatch(Command::RefreshRequested);
//! app.next_update().await;
//! println!("{} devices", app.store().devices().len());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod poller;
pub mod probe;
pub mod source;
pub mod ui;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use app::{App, AppOptions, Command, DashboardView};
pub use config::Settings;
pub use data::{
    Device, DeviceId, DeviceStatus, DeviceType, Kpis, SnapshotStore, StatusFilter, Transition,
};
pub use error::SourceError;
pub use poller::{Poller, Trigger, Update};
pub use probe::{ProbeInitiator, ProbeOutcome};
pub use source::{DeviceSource, FileSource, HttpSource, HttpSourceBuilder};
