//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full record of the selected device and
//! the ping action.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_age, format_latency, format_timestamp};
use crate::data::Device;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 44;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 12;

/// Label for the ping action. Down devices are expected to time out.
pub fn ping_label(device: &Device) -> &'static str {
    if device.is_down() {
        "Ping (expect timeout)"
    } else {
        "Ping"
    }
}

/// Render the device detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, device: &Device, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let overlay_width = (area.width * 70 / 100).clamp(MIN_OVERLAY_WIDTH, 72);
    let overlay_height = MIN_OVERLAY_HEIGHT.min(area.height);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(8),    // Fields
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let now = Utc::now();
    let label = |name: &'static str| {
        Span::styled(format!(" {:<14}", name), Style::default().add_modifier(Modifier::DIM))
    };
    let status_style = app.theme.status_style(device.status);

    let lines = vec![
        Line::from(vec![
            Span::raw(format!(" {} ", app.icons.resolve(device.device_type))),
            Span::styled(device.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![label("IP address"), Span::raw(device.ip_address.clone())]),
        Line::from(vec![label("Type"), Span::raw(device.device_type.label())]),
        Line::from(vec![
            label("Location"),
            Span::raw(device.location.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(device.status.label(), status_style.add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                " for {} (since {})",
                format_age(device.status_changed_at, now),
                format_timestamp(device.status_changed_at)
            )),
        ]),
        Line::from(vec![label("Latency"), Span::raw(format_latency(device.latency))]),
        Line::from(vec![
            label("Last checked"),
            Span::raw(format!(
                "{} ({} ago)",
                format_timestamp(device.last_checked),
                format_age(device.last_checked, now)
            )),
        ]),
    ];

    let block = Block::default()
        .title(format!(" Device #{} ", device.id))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let footer = Line::from(vec![
        Span::styled(" p ", app.theme.filter_active),
        Span::raw(format!(" {}  ", ping_label(device))),
        Span::styled(" Esc ", app.theme.filter_active),
        Span::raw(" Close"),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
