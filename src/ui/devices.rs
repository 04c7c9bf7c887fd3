//! Device table rendering.
//!
//! One row per device in display order: down devices first, then by name.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, DashboardView};
use crate::data::format::{format_age, format_latency};

/// Shown in place of the table when nothing matches.
pub const EMPTY_PLACEHOLDER: &str = "No devices match your criteria.";

/// Render the device table and return the resulting scroll offset.
///
/// Scrolling starts from the previous frame's offset and only moves as far
/// as needed to keep the cursor row visible.
pub fn render(frame: &mut Frame, app: &App, view: &DashboardView<'_>, area: Rect) -> usize {
    let devices = &view.projection.devices;

    let position_info = if !devices.is_empty() {
        format!(" [{}/{}]", app.cursor.min(devices.len() - 1) + 1, devices.len())
    } else {
        String::new()
    };
    let title = format!(
        " Devices ({}/{}) [{}]{} ",
        devices.len(),
        view.kpis.total,
        app.filter().label(),
        position_info
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if devices.is_empty() {
        let text = if view.loading && view.kpis.total == 0 {
            "Loading devices..."
        } else {
            EMPTY_PLACEHOLDER
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return 0;
    }

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Name"),
        Cell::from("IP"),
        Cell::from("Location"),
        Cell::from("Status"),
        Cell::from("Latency"),
        Cell::from("Checked"),
    ])
    .height(1)
    .style(app.theme.header);

    let now = Utc::now();
    let rows: Vec<Row> = devices
        .iter()
        .map(|d| {
            let status_style = app.theme.status_style(d.status);
            let latency_style = if d.latency_ms().is_none() {
                app.theme.status_style(crate::data::DeviceStatus::Down)
            } else {
                Style::default()
            };

            let row = Row::new(vec![
                Cell::from(app.icons.resolve(d.device_type).to_string()),
                Cell::from(d.name.clone()),
                Cell::from(d.ip_address.clone()),
                Cell::from(d.location.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format!(
                    "{} for {}",
                    d.status.label(),
                    format_age(d.status_changed_at, now)
                ))
                .style(status_style),
                Cell::from(format_latency(d.latency)).style(latency_style),
                Cell::from(format!("{} ago", format_age(d.last_checked, now))),
            ]);

            if view.highlighted.contains(&d.id) {
                row.style(app.theme.flash)
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(2), // Icon
        Constraint::Fill(3),   // Name - largest share
        Constraint::Min(15),   // IP
        Constraint::Fill(2),   // Location
        Constraint::Min(14),   // Status with age
        Constraint::Min(8),    // Latency
        Constraint::Min(9),    // Checked
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default()
        .with_offset(app.table_offset.min(devices.len() - 1))
        .with_selected(Some(app.cursor.min(devices.len() - 1)));

    frame.render_stateful_widget(table, area, &mut state);
    state.offset()
}
