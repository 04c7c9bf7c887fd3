use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, Command};
use crate::data::StatusFilter;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits, even while typing
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.dispatch(Command::Quit);
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.selected_device().is_some() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.dispatch(Command::DetailClosed);
            }
            KeyCode::Char('p') => app.dispatch(Command::ProbeRequested),
            KeyCode::Char('r') => app.dispatch(Command::RefreshRequested),
            _ => {}
        }
        return;
    }

    // If search input is active, handle text input
    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.dispatch(Command::Quit),

        // Status filter
        KeyCode::Tab => app.dispatch(Command::FilterChanged(app.filter().next())),
        KeyCode::Char('1') => app.dispatch(Command::FilterChanged(StatusFilter::All)),
        KeyCode::Char('2') => app.dispatch(Command::FilterChanged(StatusFilter::Up)),
        KeyCode::Char('3') => app.dispatch(Command::FilterChanged(StatusFilter::Down)),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => open_detail(app),

        // Esc clears a leftover search
        KeyCode::Esc => {
            if !app.search().is_empty() {
                app.dispatch(Command::SearchChanged(String::new()));
            }
        }

        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Char('r') => app.dispatch(Command::RefreshRequested),
        KeyCode::Char('a') => app.dispatch(Command::AutoRefreshToggled(!app.auto_refresh())),
        KeyCode::Char('x') => app.dispatch(Command::ErrorDismissed),
        KeyCode::Char('t') => app.dispatch(Command::ThemeToggled),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while search is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm search
        KeyCode::Enter => {
            app.search_active = false;
        }

        // Cancel search (clear text and exit input mode)
        KeyCode::Esc => {
            app.search_active = false;
            app.dispatch(Command::SearchChanged(String::new()));
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.search().is_empty() {
                app.search_active = false;
            }
        }

        KeyCode::Char(c) => app.search_push(c),

        _ => {}
    }
}

fn open_detail(app: &mut App) {
    if let Some(id) = app.device_at_cursor() {
        app.dispatch(Command::DeviceSelected(id));
    }
}

/// Handle mouse events
///
/// `table_start_row` is the screen row of the first visible device row; the
/// table's scroll offset is added to map a click onto the device list.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, table_start_row: u16) {
    if app.selected_device().is_some() || app.show_help {
        return;
    }

    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click selects; clicking the row under the cursor opens it
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row < table_start_row {
                return;
            }
            let item_row = app.table_offset + (mouse.row - table_start_row) as usize;
            if item_row >= app.projection().len() {
                return;
            }
            if item_row == app.cursor {
                open_detail(app);
            } else {
                app.cursor = item_row;
            }
        }

        _ => {}
    }
}
