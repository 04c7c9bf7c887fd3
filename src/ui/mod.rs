//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`devices`]: The device table, the main view
//! - [`detail`]: Modal overlay for the selected device with the ping action
//! - [`common`]: Shared components (header, filter bar, error banner, status bar, help)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//! - [`icons`]: Per-type glyphs, configurable
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Filters (common::render_filter_bar)  │
//! ├──────────────────────────────────────┤
//! │ Error banner, when present           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Device table (devices::render)       │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod devices;
pub mod icons;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub use icons::IconResolver;
pub use theme::{Theme, ThemeChoice};

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Rows above the table: header, filter bar, and the banner when shown.
fn rows_above_table(app: &App) -> u16 {
    if app.error_banner().is_some() {
        3
    } else {
        2
    }
}

/// Screen row of the first device row (below the table border and header).
pub fn table_start_row(app: &App) -> u16 {
    rows_above_table(app) + 2
}

/// Draw one frame and return the device table's scroll offset.
pub fn render(frame: &mut Frame, app: &App) -> usize {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return app.table_offset;
    }

    let banner_height = rows_above_table(app) - 2;
    let chunks = Layout::vertical([
        Constraint::Length(1),             // Header bar
        Constraint::Length(1),             // Filters and search
        Constraint::Length(banner_height), // Error banner
        Constraint::Min(5),                // Device table
        Constraint::Length(1),             // Status bar
    ])
    .split(area);

    let view = app.view();

    common::render_header(frame, app, &view, chunks[0]);
    common::render_filter_bar(frame, app, chunks[1]);
    if let Some(message) = view.error_banner {
        common::render_error_banner(frame, app, message, chunks[2]);
    }
    let table_offset = devices::render(frame, app, &view, chunks[3]);
    common::render_status_bar(frame, app, &view, chunks[4]);

    if let Some(device) = view.selected {
        detail::render_overlay(frame, app, device, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }

    table_offset
}
