//! Watch-mode application state: the board plus form focus and cursors

use guestbook_core::{BoardApi, BoardController, Field};

/// Lines moved per PgUp/PgDn
pub const SCROLL_STEP: isize = 5;

/// Which form control has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Name,
    Message,
    Submit,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Message,
            Focus::Message => Focus::Submit,
            Focus::Submit => Focus::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Name => Focus::Submit,
            Focus::Message => Focus::Name,
            Focus::Submit => Focus::Message,
        }
    }

    /// The text input behind this control, if any
    pub fn field(self) -> Option<Field> {
        match self {
            Focus::Name => Some(Field::Name),
            Focus::Message => Some(Field::Message),
            Focus::Submit => None,
        }
    }
}

pub struct App<A: BoardApi> {
    pub board: BoardController<A>,
    /// Server shown in the title bar
    pub endpoint: String,
    pub focus: Focus,
    /// Cursor positions in characters
    pub name_cursor: usize,
    pub message_cursor: usize,
    pub should_quit: bool,
}

/// Byte offset of the `cursor`-th character
fn byte_index(value: &str, cursor: usize) -> usize {
    value
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

impl<A: BoardApi> App<A> {
    pub fn new(board: BoardController<A>, endpoint: impl Into<String>) -> Self {
        Self {
            board,
            endpoint: endpoint.into(),
            focus: Focus::Name,
            name_cursor: 0,
            message_cursor: 0,
            should_quit: false,
        }
    }

    pub fn cursor(&self, field: Field) -> usize {
        match field {
            Field::Name => self.name_cursor,
            Field::Message => self.message_cursor,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Apply an edit to the focused input and push the new value to the board
    fn edit(&mut self, op: impl FnOnce(&mut String, &mut usize)) {
        let Some(field) = self.focus.field() else {
            return;
        };
        let mut value = self.board.page().input(field).value().to_string();
        let cursor = match field {
            Field::Name => &mut self.name_cursor,
            Field::Message => &mut self.message_cursor,
        };
        op(&mut value, cursor);
        self.board.input(field, value);
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit(|value, cursor| {
            let at = byte_index(value, *cursor);
            value.insert(at, c);
            *cursor += 1;
        });
    }

    pub fn backspace(&mut self) {
        self.edit(|value, cursor| {
            if *cursor == 0 {
                return;
            }
            *cursor -= 1;
            let at = byte_index(value, *cursor);
            value.remove(at);
        });
    }

    pub fn delete(&mut self) {
        self.edit(|value, cursor| {
            if *cursor < value.chars().count() {
                let at = byte_index(value, *cursor);
                value.remove(at);
            }
        });
    }

    pub fn cursor_left(&mut self) {
        self.edit(|_, cursor| *cursor = cursor.saturating_sub(1));
    }

    pub fn cursor_right(&mut self) {
        self.edit(|value, cursor| *cursor = (*cursor + 1).min(value.chars().count()));
    }

    pub fn cursor_home(&mut self) {
        self.edit(|_, cursor| *cursor = 0);
    }

    pub fn cursor_end(&mut self) {
        self.edit(|value, cursor| *cursor = value.chars().count());
    }

    /// Keep cursors inside their inputs after the board changed them (form reset)
    pub fn clamp_cursors(&mut self) {
        let page = self.board.page();
        self.name_cursor = self.name_cursor.min(page.name.value().chars().count());
        self.message_cursor = self.message_cursor.min(page.message.value().chars().count());
    }

    pub fn scroll_up(&mut self) {
        self.board.scroll_by(-SCROLL_STEP);
    }

    pub fn scroll_down(&mut self) {
        self.board.scroll_by(SCROLL_STEP);
    }
}

/// App over a client that is never called
#[cfg(test)]
pub(crate) fn offline_app() -> App<guestbook_core::HttpBoardClient> {
    let client = guestbook_core::HttpBoardClient::new("http://127.0.0.1:9", false).unwrap();
    App::new(BoardController::new(client), "http://127.0.0.1:9")
}
