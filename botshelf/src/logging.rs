//! File logging.
//!
//! The terminal belongs to the UI, so `tracing` output goes to
//! `$XDG_STATE_HOME/botshelf/botshelf.log` (or `~/.local/state/botshelf/`)
//! without ANSI colors. A log file that cannot be opened disables logging
//! instead of aborting startup.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn state_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        PathBuf::from(state).join("botshelf")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("state").join("botshelf")
    } else {
        std::env::temp_dir().join("botshelf")
    }
}

/// Installs the global subscriber. Returns the log path when logging is active.
pub fn init(filter: &str) -> Option<PathBuf> {
    let dir = state_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("botshelf: cannot create log directory {dir:?}: {e}");
        return None;
    }
    let path = dir.join("botshelf.log");
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("botshelf: cannot open log file {path:?}: {e}");
            return None;
        }
    };
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("botshelf: invalid log_filter '{filter}': {e}");
        EnvFilter::new("info")
    });
    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("botshelf v{} starting", env!("CARGO_PKG_VERSION"));
        Some(path)
    } else {
        None
    }
}
