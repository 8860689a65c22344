//! Event bus for botshelf.
//!
//! Terminal input, timer ticks, and finished GitHub requests all arrive as an
//! [`AppEvent`] on one tokio unbounded channel. The main loop is the only
//! consumer and the only place application state is mutated.
//!
//! Two independent intervals drive the loop:
//! - **Render interval** (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (120 ms) advances the loading spinner.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::github::worker::FetchOutcome;

#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release/repeat are filtered).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Spinner tick.
    Tick,
    /// Render tick; triggers a `terminal.draw()` call.
    Render,
    /// A background GitHub request finished.
    Fetched(Box<FetchOutcome>),
    Quit,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender is cloned into every background fetch task; the receiver is
/// owned by the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that turns crossterm input and timers into [`AppEvent`]s.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream. The
/// task ends once the receiver is gone and a send fails.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(120));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "terminal input error");
                        Ok(())
                    }
                    None => tx.send(AppEvent::Quit),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
