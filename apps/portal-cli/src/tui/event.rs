//! Keyboard event handling for the dashboard.

use super::app::{App, InputMode, Panel, SettingsRow};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use portal_core::Route;
use std::time::Duration;

/// Handle input events. Returns true if the app should quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    // Short timeout so background results and toasts stay fresh
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_event(app, key));
            }
        }
    }
    Ok(false)
}

/// Handle a key event. Returns true if the app should quit.
fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.show_account_dialog {
        handle_account_dialog(app, key);
        return false;
    }

    if app.input_mode == InputMode::Editing {
        handle_edit_mode(app, key);
        return false;
    }

    let dashboard = !app.is_public();
    match key.code {
        KeyCode::Char('q') => return true,

        KeyCode::Tab | KeyCode::BackTab => app.next_panel(),

        KeyCode::Char('j') | KeyCode::Down => match app.active_panel {
            Panel::Sidebar => app.sidebar.select_next(),
            Panel::Main => app.main_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.active_panel {
            Panel::Sidebar => app.sidebar.select_prev(),
            Panel::Main => app.main_up(),
        },

        KeyCode::Enter => match app.active_panel {
            Panel::Sidebar => app.activate_sidebar(),
            Panel::Main => app.activate_main(),
        },
        KeyCode::Char('e') if app.active_panel == Panel::Main => app.begin_edit(),

        // Sidebar
        KeyCode::Char('c') if dashboard => app.sidebar.toggle_collapsed(),
        KeyCode::Char('m') if dashboard => {
            app.sidebar.open = !app.sidebar.open;
            app.active_panel = if app.sidebar.open {
                Panel::Sidebar
            } else {
                Panel::Main
            };
        }
        KeyCode::Esc if app.sidebar.open => {
            app.sidebar.open = false;
            app.active_panel = Panel::Main;
        }
        KeyCode::Char('u') if dashboard => app.toggle_account_dialog(),
        KeyCode::Char('x') if dashboard => app.start_logout(),

        // Settings
        KeyCode::Char('s') => app.start_settings_save(),
        KeyCode::Char('r') => app.start_settings_load(),
        KeyCode::Char('v') => app.toggle_mask_selected(),
        KeyCode::Char(' ') if app.selected_settings_row() == Some(SettingsRow::LinkedinActive) => {
            app.toggle_linkedin()
        }

        KeyCode::Char('L') if !dashboard => app.navigate(Route::Login),

        _ => {}
    }

    app.should_quit
}

fn handle_account_dialog(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('u') => app.toggle_account_dialog(),
        KeyCode::Enter => {
            app.toggle_account_dialog();
            app.start_logout();
        }
        _ => {}
    }
}

fn handle_edit_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.clear();
        }
        KeyCode::Char(c) => app.edit_buffer.push(c),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        _ => {}
    }
}
