//! UI rendering using ratatui

use std::time::Instant;

use chrono::Local;
use guestbook_core::format::{format_clock, format_message, format_timestamp_at};
use guestbook_core::models::{NotificationKind, NotificationPhase};
use guestbook_core::page::{EMPTY_STATE_TEXT, LOADING_TEXT, LOAD_FAILED_TEXT};
use guestbook_core::{BoardApi, CounterLevel, Field, MessageArea};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Focus};
use super::markup::markup_lines;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
const SUCCESS: Color = Color::Green;
const ERROR: Color = Color::Red;
const WARNING: Color = Color::Yellow;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Height of the message input including borders
const MESSAGE_INPUT_HEIGHT: u16 = 6;

/// Render the entire UI
pub fn render<A: BoardApi>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                    // Title
            Constraint::Length(1),                    // Banner
            Constraint::Length(3),                    // Name
            Constraint::Length(MESSAGE_INPUT_HEIGHT), // Message
            Constraint::Length(1),                    // Submit button
            Constraint::Min(5),                       // Messages
            Constraint::Length(1),                    // Help
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_banner(frame, app, chunks[1]);
    render_input(frame, app, Field::Name, chunks[2]);
    render_input(frame, app, Field::Message, chunks[3]);
    render_submit(frame, app, chunks[4]);
    render_messages(frame, app, chunks[5]);
    render_help(frame, chunks[6]);
}

fn render_title<A: BoardApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Guestbook ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("· {}", app.endpoint), Style::default().fg(SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_banner<A: BoardApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let Some(notification) = app.board.page().notification() else {
        return;
    };

    let color = match notification.kind {
        NotificationKind::Success => SUCCESS,
        NotificationKind::Error => ERROR,
    };
    let style = match notification.phase(Instant::now()) {
        NotificationPhase::Visible => Style::default().fg(color).add_modifier(Modifier::BOLD),
        NotificationPhase::Fading => Style::default().fg(DIM),
        NotificationPhase::Expired => return,
    };

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {}", notification.text), style)),
        area,
    );
}

fn counter_color(level: CounterLevel) -> Color {
    match level {
        CounterLevel::Neutral => SECONDARY,
        CounterLevel::Warning => WARNING,
        CounterLevel::Critical => ERROR,
    }
}

/// Row and column of a char cursor in unwrapped text
fn cursor_position(value: &str, cursor: usize) -> (u16, u16) {
    let before: String = value.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
    (row as u16, col as u16)
}

fn render_input<A: BoardApi>(frame: &mut Frame, app: &App<A>, field: Field, area: Rect) {
    let input = app.board.page().input(field);
    let is_focused = app.focus.field() == Some(field);

    let title = match field {
        Field::Name => " Name ",
        Field::Message => " Message ",
    };
    let counter = input.counter();
    let border_style = if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(SECONDARY)
    };

    let block = Block::default()
        .title(title)
        .title_style(if is_focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(SECONDARY)
        })
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", counter.label()),
                Style::default().fg(counter_color(counter.level())),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    let (row, col) = cursor_position(input.value(), app.cursor(field));
    let scroll_y = row.saturating_sub(inner.height.saturating_sub(1));
    let scroll_x = col.saturating_sub(inner.width.saturating_sub(1));

    let paragraph = Paragraph::new(Text::raw(input.value()))
        .block(block)
        .scroll((scroll_y, scroll_x));
    frame.render_widget(paragraph, area);

    if is_focused {
        frame.set_cursor_position(Position::new(
            inner.x + col - scroll_x,
            inner.y + row - scroll_y,
        ));
    }
}

fn render_submit<A: BoardApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let state = app.board.page().submit_state();
    let style = if state.is_disabled() {
        Style::default().fg(DIM)
    } else if app.focus == Focus::Submit {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" [ {} ] ", state.label()), style)),
        area,
    );
}

fn render_messages<A: BoardApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let page = app.board.page();
    let now = Local::now();

    let mut block = Block::default()
        .title(" Messages ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    if let Some(stats) = page.stats() {
        block = block.title_bottom(
            Line::from(vec![
                Span::raw(" 📊 Total Messages: "),
                Span::styled(stats.total.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  🕒 Last Updated: "),
                Span::styled(
                    format_clock(stats.fetched_at),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ])
            .right_aligned(),
        );
    }

    let lines: Vec<Line> = match page.messages() {
        MessageArea::Loading => vec![Line::from(Span::styled(
            LOADING_TEXT,
            Style::default().fg(DIM),
        ))],
        MessageArea::Empty => vec![Line::from(Span::styled(
            EMPTY_STATE_TEXT,
            Style::default().fg(DIM),
        ))],
        MessageArea::Failed => vec![Line::from(Span::styled(
            LOAD_FAILED_TEXT,
            Style::default().fg(ERROR),
        ))],
        MessageArea::Cards(messages) => {
            let mut lines = Vec::new();
            for message in messages {
                lines.push(Line::from(vec![
                    Span::styled(
                        message.name.clone(),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", format_timestamp_at(&message.timestamp, now)),
                        Style::default().fg(DIM),
                    ),
                ]));
                lines.extend(markup_lines(
                    &format_message(&message.message),
                    Style::default().fg(Color::White),
                ));
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let max_scroll = lines.len().saturating_sub(1);
    let scroll = page.scroll().min(max_scroll) as u16;

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = "Tab focus · Enter next/newline/post · Ctrl+S post · Ctrl+R refresh · PgUp/PgDn scroll · Esc quit";
    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(DIM))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_row_and_column() {
        assert_eq!(cursor_position("", 0), (0, 0));
        assert_eq!(cursor_position("abc", 2), (0, 2));
        assert_eq!(cursor_position("ab\ncdé\nx", 6), (1, 3));
        assert_eq!(cursor_position("ab\n", 3), (1, 0));
    }
}
