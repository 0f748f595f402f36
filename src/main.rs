use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use connect_four::config::AppConfig;
use connect_four::game::GameEngine;
use connect_four::snapshot::SnapshotStore;
use connect_four::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override board height
    #[arg(long)]
    height: Option<usize>,

    /// Override board width
    #[arg(long)]
    width: Option<usize>,

    /// Override player 1 color
    #[arg(long)]
    p1_color: Option<String>,

    /// Override player 2 color
    #[arg(long)]
    p2_color: Option<String>,

    /// Override where games are saved
    #[arg(long)]
    save_file: Option<PathBuf>,

    /// Resume the saved game instead of starting a new one
    #[arg(long)]
    resume: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(height) = cli.height {
        config.board.height = height;
    }
    if let Some(width) = cli.width {
        config.board.width = width;
    }
    if let Some(color) = cli.p1_color {
        config.players.player1_color = color;
    }
    if let Some(color) = cli.p2_color {
        config.players.player2_color = color;
    }
    if let Some(path) = cli.save_file {
        config.snapshot.path = path;
    }
    config.validate().context("invalid settings")?;

    let store = SnapshotStore::new(config.snapshot.path.clone());
    let game = if cli.resume {
        if !store.exists() {
            bail!("no saved game at {}", store.path().display());
        }
        store
            .load()
            .with_context(|| format!("resuming from {}", store.path().display()))?
            .with_win_detection(config.engine.win_detection)
    } else {
        GameEngine::from_config(&config).context("creating game")?
    };
    tracing::info!(
        height = game.board().height(),
        width = game.board().width(),
        resumed = cli.resume,
        "starting game"
    );

    run_tui(App::new(game, store)).context("terminal UI failed")
}

fn run_tui(mut app: App) -> std::io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}

/// Logs go to a file so they do not draw over the TUI. Without a file no
/// subscriber is installed.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
