use ratatui::style::{Color, Modifier, Style};

use logview_types::{LogLevel, TokenCategory};

/// Color theme for the application
pub struct Theme;

impl Theme {
    // Base colors
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    pub const SOURCE: Color = Color::Gray;
    pub const FUNCTION: Color = Color::Rgb(0xc5, 0x86, 0xc0);
    pub const SELECTED_BG: Color = Color::Rgb(0x2e, 0x2e, 0x2e);

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::HIGHLIGHT)
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Filter matches inside plain text
    pub fn search_match() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn level(level: LogLevel) -> Style {
        Style::default()
            .fg(level.color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn token(category: TokenCategory) -> Style {
        Style::default().fg(category.color())
    }

    pub fn source() -> Style {
        Style::default()
            .fg(Self::SOURCE)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn function() -> Style {
        Style::default().fg(Self::FUNCTION)
    }

    /// Background of the entry under the cursor
    pub fn selected_entry() -> Style {
        Style::default().bg(Self::SELECTED_BG)
    }

    /// Marker for the JSON argument that Enter would toggle; patched over
    /// token colors
    pub fn selected_argument() -> Style {
        Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
    }

    // Status bar
    pub fn status_bar() -> Style {
        Style::default().fg(Self::FG).bg(Color::DarkGray)
    }

    pub fn status_bar_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(LogLevel::Warn.color())
            .add_modifier(Modifier::BOLD)
    }
}
