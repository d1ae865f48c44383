//! Terminal management and main run loop
//!
//! Requests run on tokio tasks and report back over an mpsc channel; the loop
//! drains completions between key polls and is the only code that touches
//! the board.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guestbook_core::{
    ApiError, BoardApi, BoardController, Draft, GuestbookConfig, HttpBoardClient, Message,
    RefreshTicket, SubmitOutcome, SubmitStart,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::app::App;
use super::event::{handle_key, poll_event, HandleResult};
use super::ui;

/// Finished network request, delivered back to the loop
#[derive(Debug)]
pub enum Completion {
    Submitted(Result<(), ApiError>),
    Fetched(RefreshTicket, Result<Vec<Message>, ApiError>, DateTime<Local>),
}

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the watch TUI against the configured server
pub async fn run(config: GuestbookConfig) -> Result<()> {
    let client = HttpBoardClient::new(&config.endpoint, config.insecure)
        .context("Failed to build guestbook client")?;
    let mut app = App::new(BoardController::new(client), config.endpoint.clone());

    let mut terminal = init_terminal()?;

    // Main event loop
    let result = run_loop(&mut terminal, &mut app, config.refresh_interval());

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

fn spawn_fetch<A: BoardApi + 'static>(
    api: Arc<A>,
    ticket: RefreshTicket,
    tx: UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let result = api.fetch_messages().await;
        // Receiver is gone once the loop has exited
        let _ = tx.send(Completion::Fetched(ticket, result, Local::now()));
    });
}

fn spawn_submit<A: BoardApi + 'static>(
    api: Arc<A>,
    draft: Draft,
    tx: UnboundedSender<Completion>,
) {
    tokio::spawn(async move {
        let result = api.create_message(&draft).await;
        let _ = tx.send(Completion::Submitted(result));
    });
}

fn start_refresh<A: BoardApi + 'static>(app: &mut App<A>, tx: &UnboundedSender<Completion>) {
    let ticket = app.board.begin_refresh();
    debug!(ticket = ticket.seq(), "refresh started");
    spawn_fetch(app.board.api(), ticket, tx.clone());
}

/// Apply every completion that has arrived since the last pass
pub fn drain_completions<A: BoardApi + 'static>(
    app: &mut App<A>,
    rx: &mut UnboundedReceiver<Completion>,
    tx: &UnboundedSender<Completion>,
) {
    while let Ok(completion) = rx.try_recv() {
        match completion {
            Completion::Submitted(result) => {
                if let SubmitOutcome::Posted(ticket) = app.board.finish_submit(result) {
                    spawn_fetch(app.board.api(), ticket, tx.clone());
                }
                app.clamp_cursors();
            }
            Completion::Fetched(ticket, result, fetched_at) => {
                app.board.finish_refresh(ticket, result, fetched_at);
            }
        }
    }
}

/// Main event loop
fn run_loop<A: BoardApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<A>,
    refresh_interval: Duration,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    start_refresh(app, &tx);
    let mut next_refresh = Instant::now() + refresh_interval;

    loop {
        // Render UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events (with 100ms timeout for responsive UI)
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            match handle_key(app, key) {
                HandleResult::Quit => app.should_quit = true,
                HandleResult::Continue => {}
                HandleResult::Submit => {
                    if let SubmitStart::Ready(draft) = app.board.begin_submit() {
                        spawn_submit(app.board.api(), draft, tx.clone());
                    }
                }
                HandleResult::Refresh => {
                    start_refresh(app, &tx);
                    next_refresh = Instant::now() + refresh_interval;
                }
            }
        }

        drain_completions(app, &mut rx, &tx);

        let now = Instant::now();
        if now >= next_refresh {
            start_refresh(app, &tx);
            next_refresh = now + refresh_interval;
        }
        app.board.tick(now);

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::offline_app;
    use guestbook_core::{Field, MessageArea, NotificationKind};

    fn message(name: &str) -> Message {
        Message {
            id: None,
            name: name.into(),
            message: "hi".into(),
            timestamp: "2024-06-15T12:00:00".into(),
        }
    }

    #[tokio::test]
    async fn completions_apply_in_arrival_order() {
        let mut app = offline_app();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let older = app.board.begin_refresh();
        let newer = app.board.begin_refresh();
        tx.send(Completion::Fetched(newer, Ok(vec![message("new")]), Local::now()))
            .unwrap();
        tx.send(Completion::Fetched(older, Ok(vec![]), Local::now()))
            .unwrap();

        drain_completions(&mut app, &mut rx, &tx);

        assert_eq!(
            app.board.page().messages(),
            &MessageArea::Cards(vec![message("new")])
        );
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_and_cursor() {
        let mut app = offline_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.board.input(Field::Name, "Ada");
        app.board.input(Field::Message, "Hi");
        app.name_cursor = 3;

        assert!(matches!(app.board.begin_submit(), SubmitStart::Ready(_)));
        tx.send(Completion::Submitted(Err(ApiError::Transport("refused".into()))))
            .unwrap();
        drain_completions(&mut app, &mut rx, &tx);

        assert_eq!(app.board.page().name.value(), "Ada");
        assert_eq!(app.name_cursor, 3);
        assert_eq!(
            app.board.page().notification().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }
}
