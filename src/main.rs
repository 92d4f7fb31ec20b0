use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use chain_reaction::config::AppConfig;
use chain_reaction::session::{AgentKind, Session};

/// Play one chain-reaction game between two automated players.
#[derive(Parser)]
#[command(name = "chain_reaction", about = "Play a chain-reaction game")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "chain_reaction.toml")]
    config: PathBuf,

    /// Override board size
    #[arg(long)]
    size: Option<usize>,

    /// Override search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Red player: minimax or random
    #[arg(long)]
    red: Option<String>,

    /// Blue player: minimax or random
    #[arg(long)]
    blue: Option<String>,

    /// Seed for random players
    #[arg(long)]
    seed: Option<u64>,

    /// Only print the result, not the board after each move
    #[arg(long)]
    quiet: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_kind(name: &str) -> Result<AgentKind> {
    match AgentKind::parse(name) {
        Some(kind) => Ok(kind),
        None => bail!("unknown player '{}' (expected 'minimax' or 'random')", name),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(size) = cli.size {
        config.board.size = size;
    }
    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    if let Some(red) = &cli.red {
        config.game.red = parse_kind(red)?;
    }
    if let Some(blue) = &cli.blue {
        config.game.blue = parse_kind(blue)?;
    }
    if cli.seed.is_some() {
        config.game.seed = cli.seed;
    }
    config.validate().context("invalid configuration")?;

    let mut session = Session::from_config(&config)?;
    if !cli.quiet {
        session.subscribe(|board| println!("{}\n", board.display_string()));
    }

    let summary = session.run()?;
    match summary.winner {
        Some(side) => println!("{} wins after {} moves", side.name(), summary.moves),
        None => println!("No winner after {} moves", summary.moves),
    }
    Ok(())
}
