use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::{Layout, Theme};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::popup(frame.area(), 50, 28);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Navigation"),
            Self::key_line("j/↓", "Next entry"),
            Self::key_line("k/↑", "Previous entry"),
            Self::key_line("Ctrl+d", "Page down"),
            Self::key_line("Ctrl+u", "Page up"),
            Self::key_line("g", "Go to top"),
            Self::key_line("G", "Go to bottom"),
            Line::from(""),
            Self::section("JSON arguments"),
            Self::key_line("Tab", "Select next argument"),
            Self::key_line("Shift+Tab", "Select previous argument"),
            Self::key_line("Enter", "Expand/collapse selected"),
            Self::key_line("E", "Expand/collapse all"),
            Line::from(""),
            Self::section("Actions"),
            Self::key_line("/", "Filter entries"),
            Self::key_line("n", "Clear filter"),
            Self::key_line("o", "Open source location"),
            Self::key_line("t", "Toggle timestamps"),
            Self::key_line("f", "Toggle function names"),
            Self::key_line("s", "Toggle level counts"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::PRIMARY))
                .title(Span::styled(" Help ", Theme::title())),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn section(name: &str) -> Line<'_> {
        Line::from(Span::styled(name, Style::default().fg(Theme::HIGHLIGHT)))
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                format!("  {:>9}", key),
                Style::default().fg(ratatui::style::Color::Green),
            ),
            Span::styled(format!("  {}", desc), Theme::text()),
        ])
    }
}
