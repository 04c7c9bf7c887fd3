//! Filtering, searching and ordering of the device list for display.

use std::cmp::Ordering;

use super::device::{Device, DeviceStatus};

/// Status filter chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Up,
    Down,
}

impl StatusFilter {
    /// Cycle All → Up → Down → All.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Up,
            StatusFilter::Up => StatusFilter::Down,
            StatusFilter::Down => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Up => "Up",
            StatusFilter::Down => "Down",
        }
    }

    pub fn admits(&self, status: DeviceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Up => status == DeviceStatus::Up,
            StatusFilter::Down => status == DeviceStatus::Down,
        }
    }
}

/// Summary counters over the full device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kpis {
    pub total: usize,
    pub up: usize,
    pub down: usize,
}

impl Kpis {
    pub fn of(devices: &[Device]) -> Self {
        let down = devices.iter().filter(|d| d.is_down()).count();
        Self {
            total: devices.len(),
            up: devices.len() - down,
            down,
        }
    }
}

/// Result of [`project`]: the devices to display, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    pub devices: Vec<&'a Device>,
}

impl<'a> Projection<'a> {
    /// No device matched the criteria. Rendered as a placeholder, not an error.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn get(&self, index: usize) -> Option<&'a Device> {
        self.devices.get(index).copied()
    }
}

/// Check a device against the search term.
///
/// Names match case-insensitively; IP addresses match as raw substrings.
pub fn matches_search(device: &Device, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    device.name.to_lowercase().contains(&term.to_lowercase()) || device.ip_address.contains(term)
}

/// Display ordering: Down before Up, then by name, then by id.
pub fn display_order(a: &Device, b: &Device) -> Ordering {
    status_rank(a.status)
        .cmp(&status_rank(b.status))
        .then_with(|| compare_names(&a.name, &b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn status_rank(status: DeviceStatus) -> u8 {
    match status {
        DeviceStatus::Down => 0,
        DeviceStatus::Up => 1,
    }
}

/// Case-insensitive comparison with the raw string as tie-break, so that
/// "alpha" < "Beta" < "beta" < "gamma".
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Filter and order devices for display.
///
/// Pure: the same inputs always give the same output.
pub fn project<'a>(devices: &'a [Device], search: &str, filter: StatusFilter) -> Projection<'a> {
    let mut list: Vec<&Device> = devices
        .iter()
        .filter(|d| filter.admits(d.status) && matches_search(d, search))
        .collect();
    list.sort_by(|a, b| display_order(a, b));
    Projection { devices: list }
}
