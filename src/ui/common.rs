//! Common UI components.
//!
//! This module contains the header bar, filter bar, error banner, status bar,
//! and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, DashboardView};
use crate::data::{DeviceStatus, StatusFilter};

/// Render the header bar with the KPI counters and refresh state.
pub fn render_header(frame: &mut Frame, app: &App, view: &DashboardView<'_>, area: Rect) {
    let kpis = view.kpis;

    // Overall status indicator
    let status_style = if kpis.down > 0 {
        app.theme.status_style(DeviceStatus::Down)
    } else {
        app.theme.status_style(DeviceStatus::Up)
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("DEVWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", kpis.total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" total "),
        Span::styled(format!("{}", kpis.up), Style::default().fg(app.theme.up)),
        Span::raw(" up "),
        if kpis.down > 0 {
            Span::styled(
                format!("{}", kpis.down),
                Style::default().fg(app.theme.down).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" down │ "),
    ];

    if view.auto_refresh {
        spans.push(Span::styled(
            format!("auto {}s", app.refresh_interval().as_secs()),
            Style::default().fg(app.theme.highlight),
        ));
    } else {
        spans.push(Span::styled("manual", Style::default().add_modifier(Modifier::DIM)));
    }

    if let Some(updated) = view.last_updated {
        spans.push(Span::raw(format!(" │ Updated {}", updated.format("%H:%M:%S"))));
    }

    if view.loading {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("Loading...", Style::default().fg(app.theme.notice)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status filter tabs and the search field.
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    const FILTERS: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Up, StatusFilter::Down];

    let titles: Vec<Line> = FILTERS
        .iter()
        .enumerate()
        .map(|(i, f)| Line::from(format!(" {}:{} ", i + 1, f.label())))
        .collect();
    let selected = FILTERS.iter().position(|f| *f == app.filter()).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.filter_inactive)
        .highlight_style(app.theme.filter_active)
        .divider("|");

    let search = if app.search_active {
        Span::styled(format!(" /{}_", app.search()), Style::default().fg(app.theme.highlight))
    } else if !app.search().is_empty() {
        Span::raw(format!(" /{}/ [Esc:clear]", app.search()))
    } else {
        Span::styled(" /:search name or IP", Style::default().add_modifier(Modifier::DIM))
    };

    // Tabs take a fixed width; the search field gets the rest
    let tabs_width = 30.min(area.width);
    let tabs_area = Rect::new(area.x, area.y, tabs_width, area.height);
    let search_area = Rect::new(area.x + tabs_width, area.y, area.width - tabs_width, area.height);

    frame.render_widget(tabs, tabs_area);
    frame.render_widget(Paragraph::new(Line::from(search)), search_area);
}

/// Render the dismissable fetch error banner.
pub fn render_error_banner(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let line = Line::from(vec![
        Span::raw(format!(" {} ", message)),
        Span::styled("[r:retry x:dismiss]", Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line).style(app.theme.error), area);
}

/// Render the status bar at the bottom.
///
/// Shows the current notification when there is one, otherwise the data
/// source and available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, view: &DashboardView<'_>, area: Rect) {
    if let Some(msg) = view.notification {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.notice));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.search_active {
        "Type to search | Enter:apply Esc:cancel"
    } else if view.selected.is_some() {
        "p:ping r:refresh Esc:close"
    } else {
        "/:search Tab:filter Enter:detail r:refresh a:auto ?:help q:quit"
    };

    let status = format!(" {} | {}", app.source_description(), controls);
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Device detail"),
        Line::from("  Esc         Close / clear search"),
        Line::from(""),
        section(" Filtering"),
        Line::from("  /           Search name or IP"),
        Line::from("  Tab         Cycle status filter"),
        Line::from("  1/2/3       All / Up / Down"),
        Line::from(""),
        section(" General"),
        Line::from("  p           Ping (in detail)"),
        Line::from("  r           Refresh now / retry"),
        Line::from("  a           Toggle auto-refresh"),
        Line::from("  x           Dismiss error"),
        Line::from("  t           Toggle theme"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
