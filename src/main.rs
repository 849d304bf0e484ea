mod app;
mod audio;
mod config;
mod engine;
mod logging;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::heartbeat::Heartbeat;
use crate::app::state::AppState;
use crate::audio::{CueSink, TerminalBell};
use crate::config::{AppConfig, PreferenceStore};
use crate::engine::{Engine, Preferences};
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    if let Some(path) = logging::init(&cfg.logging)? {
        info!(log = %path.display(), "logging started");
    }

    let store = PreferenceStore::new(config::preferences_path());
    let preferences = store.load();
    info!(path = %store.path().display(), sound = preferences.sound_enabled, "preferences loaded");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &cfg, store, preferences).await;

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: &AppConfig,
    store: PreferenceStore,
    preferences: Preferences,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(Engine::new(preferences), cfg);
    let mut heartbeat = Heartbeat::new(event_tx.clone());
    let mut bell = TerminalBell::stdout(preferences.sound_enabled);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    while let Some(event) = event_rx.recv().await {
        let actions = handler::handle_event(&mut state, event);

        for action in actions {
            match action {
                Action::PlayCue { cue, sound_enabled } => bell.play(cue.as_deref(), sound_enabled),
                Action::SetSoundEnabled(enabled) => bell.set_enabled(enabled),
                Action::SavePreferences(preferences) => {
                    // Failures are logged by the store.
                    let store = store.clone();
                    tokio::task::spawn_blocking(move || store.save(&preferences));
                }
                Action::ArmHeartbeat { generation } => heartbeat.arm(generation),
                Action::CancelHeartbeat => heartbeat.cancel(),
                Action::Quit => state.should_quit = true,
            }
        }

        if state.should_quit {
            heartbeat.cancel();
            info!("quitting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}
