//! Color themes.
//!
//! - `dark` uses ANSI 16 colors only and works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha RGB palette and needs
//!   truecolor; ratatui degrades it to the nearest 256-color value otherwise.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panels
    pub border_active: Color,
    pub border_inactive: Color,
    /// Highlight for the card or row under the cursor.
    pub selection: Color,

    // Text
    pub title: Color,
    pub accent: Color,
    pub muted: Color,
    pub link: Color,
    pub error: Color,

    // Gallery cards
    pub badge_fg: Color,
    pub badge_bg: Color,

    // Diff view
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    pub diff_hunk_header: Color,
    pub line_number: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_view: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,
            selection: Color::LightBlue,

            title: Color::White,
            accent: Color::LightMagenta,
            muted: Color::DarkGray,
            link: Color::Blue,
            error: Color::Red,

            badge_fg: Color::Black,
            badge_bg: Color::LightMagenta,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            diff_hunk_header: Color::Cyan,
            line_number: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_view: Color::Cyan,
        }
    }

    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let pink = Color::Rgb(245, 194, 231); // #f5c2e7
        let sky = Color::Rgb(137, 220, 235); // #89dceb
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,
            selection: sky,

            title: text,
            accent: pink,
            muted: overlay0,
            link: blue,
            error: red,

            badge_fg: base,
            badge_bg: pink,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            diff_hunk_header: teal,
            line_number: overlay0,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_view: lavender,
        }
    }

    /// Resolves a config theme name. Unknown names fall back to `dark`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
