use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guestbook_core::GuestbookConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Show the effective config (file values plus flags and env)
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// `load` yields the config file with command-line overrides applied.
/// Only `show` calls it.
pub fn run_config(
    args: ConfigArgs,
    load: impl FnOnce() -> Result<GuestbookConfig>,
) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show => run_show(&load()?),
        ConfigCommands::Path => run_path(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = GuestbookConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    GuestbookConfig::default()
        .save_to(&config_path)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point `endpoint` at your guestbook server");
    println!("  3. Run: guestbook list");

    Ok(())
}

fn run_show(effective: &GuestbookConfig) -> Result<()> {
    let toml_str = effective
        .to_toml()
        .context("Failed to serialize config to TOML")?;

    println!("{}", toml_str);

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", GuestbookConfig::config_path().display());
    Ok(())
}
