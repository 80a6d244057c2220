//! Keyboard and mouse input handlers.
//!
//! Maps terminal events onto [`TableController`](crate::controller::TableController)
//! transitions. The KeyAction enum tells the main loop what to do next.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::warn;

use crate::controller::Direction;
use crate::page::PageStep;
use crate::state::{App, AppMode};

/// Result of handling a key event.
#[derive(Debug, PartialEq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Exit the application
    Quit,
    /// Display a status message
    StatusMessage(String),
    /// Change input mode
    ModeChange(AppMode),
}

/// Dispatch a key event according to the current mode.
pub fn handle_key(key: &KeyEvent, app: &mut App) -> KeyAction {
    match app.mode {
        AppMode::Normal => handle_normal_mode(key, app),
        _ => {
            let (action, done) = handle_input_mode(key, app);
            if done {
                app.set_mode(AppMode::Normal);
            }
            action
        }
    }
}

/// Handle key events in normal mode.
pub fn handle_normal_mode(key: &KeyEvent, app: &mut App) -> KeyAction {
    let ctl = &mut app.controller;
    match key.code {
        // Quit on 'q' or Ctrl+C
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Row selection, cyclic within the page
        KeyCode::Char('j') | KeyCode::Down => {
            ctl.move_selection(Direction::Down);
            KeyAction::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            ctl.move_selection(Direction::Up);
            KeyAction::None
        }

        // Column focus
        KeyCode::Char('h') | KeyCode::Left => {
            app.focused_col = app.focused_col.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.focused_col + 1 < ctl.columns().len() {
                app.focused_col += 1;
            }
            KeyAction::None
        }

        // Paging: n/p wrap around, g/G jump to first/last
        KeyCode::Char('n') | KeyCode::PageDown => {
            ctl.advance_page(PageStep::Next);
            KeyAction::None
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            ctl.advance_page(PageStep::Prev);
            KeyAction::None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            ctl.go_to_page(1);
            KeyAction::None
        }
        KeyCode::Char('G') | KeyCode::End => {
            ctl.go_to_page(usize::MAX);
            KeyAction::None
        }

        KeyCode::Char('s') => match app.focused_key() {
            Some(col) => match app.controller.cycle_sort(&col) {
                Ok(_) => KeyAction::None,
                Err(e) => KeyAction::StatusMessage(e.to_string()),
            },
            None => KeyAction::None,
        },

        KeyCode::Char('x') => match app.focused_key() {
            Some(col) => match app.controller.clear_filter(&col) {
                Ok(()) => KeyAction::StatusMessage(format!("Filter on '{}' cleared", col)),
                Err(e) => KeyAction::StatusMessage(e.to_string()),
            },
            None => KeyAction::None,
        },

        KeyCode::Char('r') => {
            ctl.reset_filters();
            KeyAction::StatusMessage("Filters cleared".to_string())
        }

        KeyCode::Char('/') => {
            if ctl.columns().is_empty() {
                KeyAction::None
            } else {
                KeyAction::ModeChange(AppMode::FilterInput)
            }
        }
        KeyCode::Char(':') => KeyAction::ModeChange(AppMode::PageInput),
        KeyCode::Char('z') => KeyAction::ModeChange(AppMode::PageSizeInput),

        _ => KeyAction::None,
    }
}

/// Handle key events in the filter, page and page-size input modes.
///
/// Returns (KeyAction, bool) where bool indicates whether to return to Normal mode.
pub fn handle_input_mode(key: &KeyEvent, app: &mut App) -> (KeyAction, bool) {
    match key.code {
        // Cancel and return to normal mode
        KeyCode::Esc => (KeyAction::None, true),

        KeyCode::Enter => (commit_input(app), true),

        // Cycle through the focused column's distinct values
        KeyCode::Tab if app.mode == AppMode::FilterInput => {
            cycle_suggestion(app);
            (KeyAction::None, false)
        }

        KeyCode::Char(c) => {
            app.input_buffer.push(c);
            app.suggestion_idx = None;
            (KeyAction::None, false)
        }

        KeyCode::Backspace => {
            app.input_buffer.pop();
            app.suggestion_idx = None;
            (KeyAction::None, false)
        }

        _ => (KeyAction::None, false),
    }
}

fn cycle_suggestion(app: &mut App) {
    let Some(col) = app.focused_key() else {
        return;
    };
    let Ok(values) = app.controller.filter_suggestions(&col) else {
        return;
    };
    if values.is_empty() {
        return;
    }
    let next = app.suggestion_idx.map_or(0, |i| (i + 1) % values.len());
    app.suggestion_idx = Some(next);
    app.input_buffer = values[next].clone();
}

fn commit_input(app: &mut App) -> KeyAction {
    let input = app.input_buffer.trim().to_string();
    match app.mode {
        AppMode::FilterInput => {
            let Some(col) = app.focused_key() else {
                return KeyAction::None;
            };
            match app.controller.apply_filter_input(&col, &input) {
                Ok(()) => KeyAction::None,
                Err(e) => {
                    warn!(column = %col, error = %e, "filter input rejected");
                    KeyAction::StatusMessage(e.to_string())
                }
            }
        }
        AppMode::PageInput => match input.parse::<usize>() {
            Ok(n) => {
                app.controller.go_to_page(n);
                KeyAction::None
            }
            Err(_) => KeyAction::StatusMessage(format!("Invalid page number: {}", input)),
        },
        AppMode::PageSizeInput => match input.parse::<usize>() {
            Ok(n) => match app.controller.set_page_size(n) {
                Ok(()) => KeyAction::None,
                Err(e) => KeyAction::StatusMessage(e.to_string()),
            },
            Err(_) => {
                warn!(input = %input, "page size input rejected");
                KeyAction::StatusMessage(format!("Invalid page size: {}", input))
            }
        },
        AppMode::Normal => KeyAction::None,
    }
}

/// Handle mouse events: left click selects a body row, the wheel moves
/// the selection.
pub fn handle_mouse(mouse: &MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let body = app.body_area;
            let inside = mouse.column >= body.x
                && mouse.column < body.x + body.width
                && mouse.row >= body.y
                && mouse.row < body.y + body.height;
            if inside {
                let index = app.controller.viewport().offset + (mouse.row - body.y) as usize;
                app.controller.select_row(index);
            }
        }
        MouseEventKind::ScrollDown => app.controller.move_selection(Direction::Down),
        MouseEventKind::ScrollUp => app.controller.move_selection(Direction::Up),
        _ => {}
    }
}
