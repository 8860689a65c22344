//! botshelf: terminal gallery of chat bots with their GitHub changelogs.
//!
//! # Startup sequence
//!
//! 1. Load config and start file logging. Both are soft: a bad config file
//!    falls back to defaults and a log file that cannot be opened disables
//!    logging.
//! 2. Load the catalog and build the GitHub client. These are the only hard
//!    failures and are reported before the terminal is touched.
//! 3. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 4. Spawn the event task and run the loop.
//!
//! `restore_tui()` runs after the loop exits (quit key, SIGTERM, or channel
//! close). Inside the loop `?` appears only in the Render arm; a draw error
//! returns from `run_loop`, so restore is still reached.

mod app;
mod config;
mod event;
mod github;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use botshelf_core::catalog::load_catalog;
use botshelf_core::github::{GithubClient, GithubConfig};

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load();
    let log_path = logging::init(&config.log_filter);
    tracing::info!(log = ?log_path, config = ?config::config_path(), "configuration loaded");

    let catalog = load_catalog(&config.catalog_dir)
        .with_context(|| format!("loading bot catalog from {}", config.catalog_dir.display()))?;
    let token = config.github_token();
    if token.is_none() {
        tracing::info!(env = %config.token_env, "no GitHub token, requests are unauthenticated");
    }
    let client = GithubClient::new(
        GithubConfig::new(&config.api_base_url)
            .with_token(token)
            .with_timeout(config.request_timeout()),
    )
    .context("building GitHub client")?;

    let theme = theme::Theme::from_name(&config.theme);
    let mut state = app::AppState::new(catalog, config.submit.clone());

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initializing terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let event_tx = handler.tx;
    let mut rx = handler.rx;

    let result = run_loop(&mut terminal, &mut state, &theme, &client, &event_tx, &mut rx, &term_flag).await;

    tui::restore_tui().context("restoring terminal")?;
    tracing::info!("botshelf exiting");
    result
}

/// The event loop. Exits only by returning, so the caller always restores
/// the terminal.
async fn run_loop(
    terminal: &mut tui::Tui,
    state: &mut app::AppState,
    theme: &theme::Theme,
    client: &GithubClient,
    event_tx: &tokio::sync::mpsc::UnboundedSender<AppEvent>,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    term_flag: &std::sync::atomic::AtomicBool,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed on an idle terminal.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal
                            .draw(|frame| ui::render(frame, state, theme))
                            .context("drawing frame")?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => handle_key(key, state, theme),
                    Some(AppEvent::Mouse(mouse)) => handle_mouse(mouse, state),
                    Some(AppEvent::Tick) => {
                        state.on_tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::Fetched(outcome)) => {
                        state.apply_fetch(*outcome);
                        KeyAction::Continue
                    }
                    // The next Render reads the new size from frame.area().
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };
                match action {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Fetch(effect) => github::worker::dispatch(effect, client, event_tx),
                    KeyAction::Continue => {}
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            tracing::info!("SIGTERM received");
            return Ok(());
        }
    }
}
