use anyhow::{Context, Result};
use clap::Parser;
use gita_core::config::app_cache_dir;
use gita_core::{BookmarkStore, Preferences, VerseSource};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{AppEvent, EventHandler, TimerTicker};

#[derive(Parser)]
#[command(name = "gita")]
#[command(version, about = "Memorize and read the Bhagavad Gita in the terminal")]
struct Cli {
    /// Verse collection: a JSON file path or an http(s) URL
    #[arg(long, value_name = "PATH|URL")]
    verses: Option<String>,

    /// Write logs here instead of the cache directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Logs go to a file; the terminal belongs to the UI
fn init_tracing(log_file: Option<PathBuf>, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let path = match log_file {
        Some(path) => path,
        None => app_cache_dir()?.join("gita.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path).with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_env("GITA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file, cli.verbose)?;

    let mut preferences = Preferences::load();
    let bookmarks = BookmarkStore::load();
    let source = VerseSource::resolve(cli.verses.as_deref(), preferences.verse_source());
    tracing::info!(%source, "starting");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();

    let prefs_tx = tx.clone();
    preferences.subscribe(move |event| {
        let _ = prefs_tx.send(AppEvent::PreferenceChanged(*event));
    });

    let loader_tx = tx.clone();
    tokio::spawn(async move {
        let result = source.load().await;
        let _ = loader_tx.send(AppEvent::VersesLoaded(result));
    });

    let mut app = App::new(preferences, bookmarks, Some(tx.clone()));
    let mut ticker = TimerTicker::default();

    let result = run(&mut terminal, &mut app, &mut events, &mut ticker, &tx).await;

    ticker.stop();
    tui::restore()?;
    result
}

async fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    events: &mut EventHandler,
    ticker: &mut TimerTicker,
    tx: &tokio::sync::mpsc::UnboundedSender<AppEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        ticker.sync(app.timer_running(), tx);

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
