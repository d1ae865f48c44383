//! One-shot board commands: list, post, render
//!
//! ```bash
//! guestbook list --json | jq '.[0].name'
//! echo "Lovely site" | guestbook post --name Ada
//! guestbook render --out board.html
//! ```

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use guestbook_core::format::format_timestamp;
use guestbook_core::page::{EMPTY_STATE_TEXT, SUBMIT_BUSY_LABEL};
use guestbook_core::{
    BoardController, Field, GuestbookConfig, HttpBoardClient, Message, MessageArea,
    RefreshOutcome, SubmitOutcome,
};
use tracing::info;

use crate::ui;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
    /// Message cards as an HTML fragment
    Html,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct PostArgs {
    /// Your name (1-50 characters)
    #[arg(long, short)]
    pub name: String,

    /// Inline message text (1-500 characters)
    #[arg(long, short, conflicts_with = "file")]
    pub message: Option<String>,

    /// Read the message from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Write the page here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

fn connect(config: &GuestbookConfig) -> Result<BoardController<HttpBoardClient>> {
    let client = HttpBoardClient::new(&config.endpoint, config.insecure)
        .context("Failed to build guestbook client")?;
    Ok(BoardController::new(client))
}

fn get_output_format(output: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        OutputFormat::Json
    } else {
        output
    }
}

/// Priority: --message > --file > stdin
fn get_content(message: &Option<String>, file: &Option<PathBuf>) -> Result<String> {
    if let Some(msg) = message {
        return Ok(msg.clone());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(anyhow!(
            "No message provided. Use --message, --file, or pipe content via stdin"
        ));
    }

    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf)
}

pub async fn run_list(config: &GuestbookConfig, args: ListArgs) -> Result<()> {
    let format = get_output_format(args.output, args.json);
    let mut board = connect(config)?;

    let pb = ui::spinner("Loading messages...");
    let outcome = board.refresh().await;
    ui::finish(pb);

    if outcome == RefreshOutcome::Failed {
        return Err(anyhow!("Failed to load messages from {}", config.endpoint));
    }

    let messages: &[Message] = match board.page().messages() {
        MessageArea::Cards(messages) => messages.as_slice(),
        _ => &[],
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(messages)?);
        }
        OutputFormat::Html => {
            println!("{}", board.page().messages_html(Local::now()));
            if let Some(stats) = board.page().stats_html() {
                println!("{}", stats);
            }
        }
        OutputFormat::Human => print_human(messages),
    }

    Ok(())
}

fn print_human(messages: &[Message]) {
    println!("┌─ Guestbook :: {} messages", messages.len());
    println!("│");

    if messages.is_empty() {
        println!("│  {}", EMPTY_STATE_TEXT);
        return;
    }

    for (i, msg) in messages.iter().enumerate() {
        let is_last = i == messages.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let cont_prefix = if is_last { "   " } else { "│  " };

        println!("{} {} @ {}", prefix, msg.name, format_timestamp(&msg.timestamp));
        for line in msg.message.lines() {
            println!("{}{}", cont_prefix, line);
        }

        if !is_last {
            println!("│");
        }
    }
}

pub async fn run_post(config: &GuestbookConfig, args: PostArgs) -> Result<()> {
    let content = get_content(&args.message, &args.file)?;
    let mut board = connect(config)?;

    board.input(Field::Name, args.name);
    board.input(Field::Message, content);

    let pb = ui::spinner(SUBMIT_BUSY_LABEL);
    let outcome = board.submit().await;

    let banner = board
        .page()
        .notification()
        .map(|n| n.text.clone())
        .unwrap_or_default();

    match outcome {
        SubmitOutcome::Posted(_) => {
            if ui::is_quiet() {
                println!("✓ {}", banner);
            } else {
                ui::finish_success(pb, &banner);
            }
            if let Some(stats) = board.page().stats() {
                info!(total = stats.total, "board refreshed");
            }
            Ok(())
        }
        SubmitOutcome::Invalid(_) | SubmitOutcome::Failed(_) | SubmitOutcome::Busy => {
            ui::finish_error(pb, &banner);
            Err(anyhow!(banner))
        }
    }
}

pub async fn run_render(config: &GuestbookConfig, args: RenderArgs) -> Result<()> {
    let mut board = connect(config)?;

    let pb = ui::spinner("Loading messages...");
    board.refresh().await;
    ui::finish(pb);

    let html = board.page().to_html(Local::now(), Instant::now());

    match args.out {
        Some(path) => {
            std::fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}
