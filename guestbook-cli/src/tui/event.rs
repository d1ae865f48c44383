//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use guestbook_core::BoardApi;

use super::app::{App, Focus};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Submit the form
    Submit,
    /// Re-fetch the message list now
    Refresh,
}

/// Handle a key event
pub fn handle_key<A: BoardApi>(app: &mut App<A>, key: KeyEvent) -> HandleResult {
    if key.kind == KeyEventKind::Release {
        return HandleResult::Continue;
    }

    // Global shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => HandleResult::Quit,
            KeyCode::Char('s') => HandleResult::Submit,
            KeyCode::Char('r') => HandleResult::Refresh,
            _ => HandleResult::Continue,
        };
    }

    match key.code {
        KeyCode::Esc => HandleResult::Quit,

        // Focus
        KeyCode::Tab => {
            app.focus_next();
            HandleResult::Continue
        }
        KeyCode::BackTab => {
            app.focus_prev();
            HandleResult::Continue
        }

        // Message list
        KeyCode::PageUp => {
            app.scroll_up();
            HandleResult::Continue
        }
        KeyCode::PageDown => {
            app.scroll_down();
            HandleResult::Continue
        }

        KeyCode::Enter => match app.focus {
            Focus::Name => {
                app.focus = Focus::Message;
                HandleResult::Continue
            }
            Focus::Message => {
                app.insert_char('\n');
                HandleResult::Continue
            }
            Focus::Submit => HandleResult::Submit,
        },

        // Text editing (ignored on the submit button)
        KeyCode::Char(' ') if app.focus == Focus::Submit => HandleResult::Submit,
        KeyCode::Char(c) => {
            app.insert_char(c);
            HandleResult::Continue
        }
        KeyCode::Backspace => {
            app.backspace();
            HandleResult::Continue
        }
        KeyCode::Delete => {
            app.delete();
            HandleResult::Continue
        }
        KeyCode::Left => {
            app.cursor_left();
            HandleResult::Continue
        }
        KeyCode::Right => {
            app.cursor_right();
            HandleResult::Continue
        }
        KeyCode::Home => {
            app.cursor_home();
            HandleResult::Continue
        }
        KeyCode::End => {
            app.cursor_end();
            HandleResult::Continue
        }

        _ => HandleResult::Continue,
    }
}
