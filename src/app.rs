//! Session state and command dispatch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::debug;

use crate::data::{
    first_alert, project, Device, DeviceId, Kpis, Projection, SnapshotStore, StatusFilter,
};
use crate::poller::{FetchOutcome, Poller, Trigger, Update, DEFAULT_REFRESH_INTERVAL};
use crate::probe::ProbeInitiator;
use crate::source::DeviceSource;
use crate::ui::{IconResolver, Theme};

/// How long a notification stays visible.
const NOTIFICATION_TTL: Duration = Duration::from_millis(3500);
/// How long a device that just went down stays highlighted.
const HIGHLIGHT_TTL: Duration = Duration::from_millis(1200);

/// User intents, produced by the event layer and consumed by [`App::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SearchChanged(String),
    FilterChanged(StatusFilter),
    DeviceSelected(DeviceId),
    DetailClosed,
    ProbeRequested,
    AutoRefreshToggled(bool),
    RefreshRequested,
    ErrorDismissed,
    ThemeToggled,
    Quit,
}

/// Session settings that are not user-toggleable at runtime.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub refresh_interval: Duration,
    pub theme: Theme,
    pub icons: IconResolver,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            theme: Theme::dark(),
            icons: IconResolver::default(),
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub projection: Projection<'a>,
    pub kpis: Kpis,
    pub last_updated: Option<DateTime<Local>>,
    pub loading: bool,
    pub auto_refresh: bool,
    pub error_banner: Option<&'a str>,
    pub notification: Option<&'a str>,
    /// Devices that just went down.
    pub highlighted: HashSet<DeviceId>,
    pub selected: Option<&'a Device>,
}

/// Main application state.
///
/// Owns the snapshot store, the poller and the probe initiator. Network
/// results arrive as [`Update`]s and are applied on whichever loop owns the
/// `App`, so nothing here needs locking.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data
    source_description: String,
    store: SnapshotStore,
    poller: Poller,
    prober: ProbeInitiator,
    updates: mpsc::UnboundedReceiver<Update>,
    last_updated: Option<DateTime<Local>>,

    // View state
    search: String,
    pub search_active: bool,
    filter: StatusFilter,
    pub cursor: usize,
    /// First device row visible in the table, as of the last frame.
    pub table_offset: usize,
    selected: Option<DeviceId>,

    // Feedback
    error_banner: Option<String>,
    notification: Option<(String, Instant)>,
    highlights: HashMap<DeviceId, Instant>,

    // UI
    pub theme: Theme,
    pub icons: IconResolver,
}

impl App {
    /// Create a new App for the given source.
    ///
    /// Must be called from within a tokio runtime; nothing is fetched until
    /// a [`Command::RefreshRequested`] is dispatched.
    pub fn new(source: Arc<dyn DeviceSource>, options: AppOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            show_help: false,
            source_description: source.description().to_string(),
            store: SnapshotStore::new(),
            poller: Poller::new(source.clone(), tx.clone(), options.refresh_interval),
            prober: ProbeInitiator::new(source, tx),
            updates: rx,
            last_updated: None,
            search: String::new(),
            search_active: false,
            filter: StatusFilter::All,
            cursor: 0,
            table_offset: 0,
            selected: None,
            error_banner: None,
            notification: None,
            highlights: HashMap::new(),
            theme: options.theme,
            icons: options.icons,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn auto_refresh(&self) -> bool {
        self.poller.auto_refresh()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.poller.interval()
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    /// The device shown in the detail overlay, if any.
    pub fn selected_device(&self) -> Option<&Device> {
        self.store.get(self.selected?)
    }

    /// Get the current notification if it hasn't expired.
    pub fn notification(&self) -> Option<&str> {
        match &self.notification {
            Some((msg, at)) if at.elapsed() < NOTIFICATION_TTL => Some(msg),
            _ => None,
        }
    }

    /// Whether a device recently went down and should be emphasized.
    pub fn is_highlighted(&self, id: DeviceId) -> bool {
        self.highlights.get(&id).is_some_and(|at| at.elapsed() < HIGHLIGHT_TTL)
    }

    /// The filtered, sorted device list.
    pub fn projection(&self) -> Projection<'_> {
        project(self.store.devices(), &self.search, self.filter)
    }

    /// Snapshot of everything the renderer needs.
    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            projection: self.projection(),
            kpis: self.store.kpis(),
            last_updated: self.last_updated,
            loading: self.poller.is_loading(),
            auto_refresh: self.poller.auto_refresh(),
            error_banner: self.error_banner(),
            notification: self.notification(),
            highlighted: self
                .highlights
                .keys()
                .copied()
                .filter(|id| self.is_highlighted(*id))
                .collect(),
            selected: self.selected_device(),
        }
    }

    /// Single entry point for user intents.
    pub fn dispatch(&mut self, command: Command) {
        debug!(?command, "Dispatch");
        match command {
            Command::SearchChanged(text) => {
                self.search = text;
                self.cursor = 0;
                self.table_offset = 0;
            }
            Command::FilterChanged(filter) => {
                self.filter = filter;
                self.cursor = 0;
                self.table_offset = 0;
            }
            Command::DeviceSelected(id) => {
                if self.store.get(id).is_some() {
                    self.selected = Some(id);
                }
            }
            Command::DetailClosed => self.selected = None,
            Command::ProbeRequested => {
                let target = self.selected.and_then(|id| self.store.get(id));
                self.prober.start(target);
            }
            Command::AutoRefreshToggled(enabled) => self.poller.set_auto_refresh(enabled),
            Command::RefreshRequested => {
                self.error_banner = None;
                self.poller.request(Trigger::Manual);
            }
            Command::ErrorDismissed => self.error_banner = None,
            Command::ThemeToggled => self.theme = self.theme.toggled(),
            Command::Quit => self.running = false,
        }
    }

    /// Apply every update that has already arrived, without waiting.
    ///
    /// Returns the number of updates applied.
    pub fn poll_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates.try_recv() {
            self.apply(update);
            applied += 1;
        }
        self.highlights.retain(|_, at| at.elapsed() < HIGHLIGHT_TTL);
        applied
    }

    /// Wait for the next update and apply it.
    pub async fn next_update(&mut self) {
        if let Some(update) = self.updates.recv().await {
            self.apply(update);
        }
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Fetched {
                seq,
                trigger,
                result,
            } => match self.poller.complete(&mut self.store, seq, trigger, result) {
                FetchOutcome::Stale => {}
                FetchOutcome::Updated { transitions } => {
                    self.last_updated = Some(Local::now());
                    self.error_banner = None;

                    let now = Instant::now();
                    for t in transitions.iter().filter(|t| t.is_alert()) {
                        self.highlights.insert(t.device_id, now);
                    }
                    if let Some(alert) = first_alert(&transitions) {
                        self.notify(format!("{} is down!", alert.name));
                    }

                    if self.selected.is_some_and(|id| self.store.get(id).is_none()) {
                        self.selected = None;
                    }
                    self.clamp_cursor();
                }
                FetchOutcome::Failed(reason) => {
                    self.error_banner = Some(format!("Failed to fetch device data. {}", reason));
                }
            },
            Update::Probed {
                device_id,
                name,
                outcome,
            } => {
                let message = ProbeInitiator::apply(&mut self.store, device_id, &name, &outcome);
                self.notify(message);
            }
            Update::TimerFired => {
                self.poller.request(Trigger::Background);
            }
        }
    }

    fn notify(&mut self, message: String) {
        self.notification = Some((message, Instant::now()));
    }

    fn clamp_cursor(&mut self) {
        let len = self.projection().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.projection().len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.cursor = self.projection().len().saturating_sub(1);
    }

    /// Id of the device under the cursor.
    pub fn device_at_cursor(&self) -> Option<DeviceId> {
        self.projection().get(self.cursor).map(|d| d.id)
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Append a character to the search text.
    pub fn search_push(&mut self, c: char) {
        let mut text = self.search.clone();
        text.push(c);
        self.dispatch(Command::SearchChanged(text));
    }

    /// Remove the last character from the search text.
    pub fn search_pop(&mut self) {
        let mut text = self.search.clone();
        text.pop();
        self.dispatch(Command::SearchChanged(text));
    }
}
