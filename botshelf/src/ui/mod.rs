//! UI rendering for botshelf.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. It dispatches on the navigator's current view;
//! overlays are drawn last so they sit on top.

mod layout;
pub mod detail;
pub mod diff_view;
pub mod gallery;
pub mod help;
pub mod keybindings;
pub mod submit;

use botshelf_core::navigation::View;
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame.
///
/// Viewport heights and pane rects are written back into `state` so the next
/// keypress can compute page scrolls and mouse focus.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [main, status_bar] = compute_layout(frame);

    match state.nav.view() {
        View::Gallery => gallery::render_gallery(frame, main, state, theme),
        View::BotDetail => detail::render_detail(frame, main, state, theme),
        View::DiffView => diff_view::render_diff(frame, main, state, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::SubmitPanel => submit::render_submit_panel(frame, &state.submit, theme),
        Mode::Normal => {}
    }
}
