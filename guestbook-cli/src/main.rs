//! guestbook CLI - read and sign a guestbook server from the terminal
//!
//! - `list`: print the current messages (human, JSON, or HTML cards)
//! - `post`: validate and submit a message
//! - `render`: write the board as a standalone HTML page
//! - `watch`: interactive board with a live form and auto-refresh

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guestbook_core::GuestbookConfig;

mod commands;
mod config;
mod tracing_setup;
mod tui;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "guestbook",
    author,
    version,
    about = "Read and sign a guestbook from the terminal",
    long_about = "Client for a guestbook server. Messages are validated locally (length \
                  limits and a spam heuristic) before they are posted."
)]
struct Cli {
    /// Guestbook server base URL (overrides the config file)
    #[arg(long, env = "GUESTBOOK_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and print every message
    List(commands::board::ListArgs),
    /// Post a message (inline, from a file, or from stdin)
    Post(commands::board::PostArgs),
    /// Fetch messages and write the board as an HTML page
    Render(commands::board::RenderArgs),
    /// Interactive board: form, live counters, auto-refresh
    Watch,
    /// Manage guestbook configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Config file values with --endpoint / --insecure applied on top
fn load_config(endpoint: Option<String>, insecure: bool) -> Result<GuestbookConfig> {
    let config = GuestbookConfig::load().context("Failed to load config")?;
    Ok(config.with_overrides(endpoint, insecure))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        tui: matches!(cli.command, Commands::Watch),
    })
    .ok();

    let endpoint = cli.endpoint;
    let insecure = cli.insecure;

    match cli.command {
        Commands::List(args) => {
            commands::run_list(&load_config(endpoint, insecure)?, args).await?
        }
        Commands::Post(args) => {
            commands::run_post(&load_config(endpoint, insecure)?, args).await?
        }
        Commands::Render(args) => {
            commands::run_render(&load_config(endpoint, insecure)?, args).await?
        }
        Commands::Watch => tui::run(load_config(endpoint, insecure)?).await?,
        Commands::Config(args) => config::run_config(args, || load_config(endpoint, insecure))?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
