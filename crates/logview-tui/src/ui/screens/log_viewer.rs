use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use logview_logs::TextFilter;
use logview_render::{Fragment, RenderedEntry};
use logview_types::{LogEntry, LogLevel};

use crate::app::AppState;
use crate::ui::components::{viewer_hints, HelpOverlay, StatusBar};
use crate::ui::{Layout, Theme};

/// Log viewer screen
pub struct LogViewerScreen;

/// Per-frame display switches
struct DisplayOptions {
    show_timestamps: bool,
    show_function_names: bool,
    width: usize,
}

impl LogViewerScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let show_filter_bar =
            state.ui_state.search_active || !state.controller.document().filter().is_empty();
        let areas = Layout::viewer(frame.area(), state.ui_state.stats_visible, show_filter_bar);

        Self::render_header(frame, areas.header, state);
        if let Some(area) = areas.stats {
            Self::render_stats_bar(frame, area, state);
        }
        if let Some(area) = areas.filter {
            Self::render_filter_bar(frame, area, state);
        }
        Self::render_entries(frame, areas.entries, state);
        Self::render_status_bar(frame, areas.status, state);

        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let document = state.controller.document();

        let mut spans = vec![
            Span::styled("logview", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(state.source_name.clone(), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{} entries", document.len()), Theme::text()),
        ];
        if document.skipped_lines() > 0 {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("{} lines skipped", document.skipped_lines()),
                Theme::warning(),
            ));
        }
        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled(
            if state.controller.all_expanded() {
                "JSON expanded"
            } else {
                "JSON compact"
            },
            Theme::text_dim(),
        ));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_stats_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let counts = state.controller.document().level_counts();

        let mut spans = vec![Span::styled(" ", Theme::text())];
        for (level, count) in counts.non_zero() {
            spans.push(Span::styled(format!("{}:", level.short()), Theme::level(level)));
            spans.push(Span::styled(format!("{} ", count), Theme::text()));
        }
        spans.push(Span::styled("│ ", Theme::text_dim()));
        spans.push(Span::styled("Total:", Theme::text_dim()));
        spans.push(Span::styled(counts.total().to_string(), Theme::text()));

        let stats_widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(" Levels ", Theme::title())),
        );

        frame.render_widget(stats_widget, area);
    }

    fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let document = state.controller.document();
        let active = state.ui_state.search_active;

        let mut spans = vec![];
        if active {
            spans.push(Span::styled(
                " /",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(" Filter: ", Theme::text_dim()));
        }

        spans.push(Span::styled(
            document.filter().needle().to_string(),
            Theme::text_highlight(),
        ));

        if active {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        spans.push(Span::styled(
            format!("  {} of {} match", document.visible_count(), document.len()),
            Theme::text_dim(),
        ));

        if active {
            spans.push(Span::styled("  [Enter] Done  [Esc] Clear", Theme::text_dim()));
        } else {
            spans.push(Span::styled("  [n] Clear  [/] Edit", Theme::text_dim()));
        }

        let filter_bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if active {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" Filter ", Theme::title())),
        );

        frame.render_widget(filter_bar, area);
    }

    fn render_entries(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let display = DisplayOptions {
            show_timestamps: state.ui_state.show_timestamps,
            show_function_names: state.ui_state.show_function_names,
            // 2 for borders, 1 for scrollbar
            width: area.width.saturating_sub(3) as usize,
        };

        let visible = state.visible_indices();
        let total = visible.len();
        let cursor = state.ui_state.cursor.min(total.saturating_sub(1));
        let selected_argument = state.selected_argument_index();

        let document = state.controller.document();
        let filter = document.filter();
        let title = if filter.is_empty() {
            format!(" Entries ({}) ", total)
        } else {
            format!(" Entries ({} of {}) ", total, document.len())
        };

        let render_at = |pos: usize| -> Vec<Line<'static>> {
            let selected = pos == cursor;
            entry_lines(
                &document.entries()[visible[pos]],
                &display,
                filter,
                selected,
                if selected { selected_argument } else { None },
            )
        };

        // Entries have different heights; keep the cursor entry on screen
        let mut scroll = state.ui_state.scroll.min(cursor);
        let mut blocks: VecDeque<Vec<Line<'static>>> = VecDeque::new();
        if total > 0 {
            blocks = (scroll..=cursor).map(&render_at).collect();
            let mut used: usize = blocks.iter().map(Vec::len).sum();
            while scroll < cursor && used > inner_height {
                if let Some(block) = blocks.pop_front() {
                    used -= block.len();
                }
                scroll += 1;
            }
            let mut next = cursor + 1;
            while used < inner_height && next < total {
                let block = render_at(next);
                used += block.len();
                blocks.push_back(block);
                next += 1;
            }
        }
        let page_size = blocks.len().max(1);

        let lines: Vec<Line<'static>> = if total == 0 {
            let text = if filter.is_empty() {
                "No log entries"
            } else {
                "No entries match the filter"
            };
            vec![Line::from(Span::styled(text, Theme::text_dim()))]
        } else {
            blocks.into_iter().flatten().take(inner_height).collect()
        };

        let entries_widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::title())),
        );
        frame.render_widget(entries_widget, area);

        if total > page_size {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"));
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(total)
                .position(cursor);

            frame.render_stateful_widget(
                scrollbar,
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        state.ui_state.scroll = scroll;
        state.ui_state.page_size = page_size;
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let total = state.controller.document().visible_count();
        let position = if total == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{}", state.ui_state.cursor + 1, total)
        };

        let status = StatusBar::new()
            .hints(viewer_hints())
            .message(state.ui_state.message.as_ref().map(|m| m.text.as_str()))
            .right(position);

        frame.render_widget(status, area);
    }
}

/// Lines for one entry; expanded JSON and multi-line text continue under
/// the message column
fn entry_lines(
    rendered: &RenderedEntry,
    display: &DisplayOptions,
    filter: &TextFilter,
    selected: bool,
    selected_argument: Option<usize>,
) -> Vec<Line<'static>> {
    let entry = rendered.entry();
    let mut builder = LineBuilder::default();

    builder.push(Span::styled(
        if selected { "▶" } else { " " },
        Theme::text_highlight(),
    ));
    builder.push(Span::styled(
        format!("{:>5}", entry.line_number),
        Theme::text_dim(),
    ));
    if display.show_timestamps && !entry.timestamp.is_empty() {
        builder.push(Span::styled(format!(" {}", entry.timestamp), Theme::text_dim()));
    }
    builder.push(Span::styled(
        format!(" {:<5}", level_label(entry)),
        Theme::level(entry.level),
    ));
    builder.push(Span::styled(" │ ", Theme::text_dim()));
    let indent = builder.width();

    if let Some(label) = rendered.source_label() {
        builder.push(Span::styled(label, Theme::source()));
        builder.push(Span::raw(" "));
    }
    if display.show_function_names && !entry.function_name.is_empty() {
        builder.push(Span::styled(entry.function_name.clone(), Theme::function()));
        builder.push(Span::raw(" "));
    }

    let base = level_text_style(entry.level);
    for (idx, fragment) in rendered.fragments().iter().enumerate() {
        if idx > 0 {
            builder.push(Span::raw(" "));
        }
        match fragment {
            Fragment::Plain { text } => {
                let mut last_end = 0;
                for (start, end) in filter.find_matches(text) {
                    builder.push_text(&text[last_end..start], base, indent);
                    builder.push_text(&text[start..end], Theme::search_match(), indent);
                    last_end = end;
                }
                builder.push_text(&text[last_end..], base, indent);
            }
            Fragment::Json { tokens, .. } => {
                let marker = if selected_argument == Some(idx) {
                    Theme::selected_argument()
                } else {
                    Style::default()
                };
                for token in tokens {
                    builder.push_text(&token.text, Theme::token(token.category).patch(marker), indent);
                }
            }
        }
    }

    let lines = builder.finish(display.width);
    if selected {
        lines
            .into_iter()
            .map(|line| line.style(Theme::selected_entry()))
            .collect()
    } else {
        lines
    }
}

/// Level column: the record's own level text, upper-cased
fn level_label(entry: &LogEntry) -> String {
    if entry.level_text.is_empty() {
        "-".to_string()
    } else {
        entry.level_text.to_uppercase().chars().take(5).collect()
    }
}

/// Get text style based on log level
fn level_text_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error | LogLevel::Fatal => Style::default().fg(Color::LightRed),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        _ => Theme::text(),
    }
}

/// Accumulates spans into lines, breaking on embedded newlines
#[derive(Default)]
struct LineBuilder {
    lines: Vec<Vec<Span<'static>>>,
}

impl LineBuilder {
    fn current(&mut self) -> &mut Vec<Span<'static>> {
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn push(&mut self, span: Span<'static>) {
        self.current().push(span);
    }

    /// Display width of the line being built
    fn width(&self) -> usize {
        self.lines
            .last()
            .map(|spans| spans.iter().map(|s| s.content.width()).sum())
            .unwrap_or(0)
    }

    fn push_text(&mut self, text: &str, style: Style, indent: usize) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.lines.push(vec![Span::raw(" ".repeat(indent))]);
            }
            let part = part.trim_end_matches('\r');
            if !part.is_empty() {
                self.push(Span::styled(part.replace('\t', "    "), style));
            }
        }
    }

    fn finish(self, max_width: usize) -> Vec<Line<'static>> {
        self.lines
            .into_iter()
            .map(|spans| Line::from(truncate_spans(spans, max_width)))
            .collect()
    }
}

/// Cut a line to a display width, marking the cut with an ellipsis
fn truncate_spans(spans: Vec<Span<'static>>, max_width: usize) -> Vec<Span<'static>> {
    let total: usize = spans.iter().map(|s| s.content.width()).sum();
    if total <= max_width {
        return spans;
    }
    if max_width == 0 {
        return Vec::new();
    }

    let budget = max_width - 1;
    let mut out = Vec::new();
    let mut used = 0;
    for span in spans {
        let width = span.content.width();
        if used + width <= budget {
            used += width;
            out.push(span);
            continue;
        }
        let mut cut = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            cut.push(c);
        }
        if !cut.is_empty() {
            out.push(Span::styled(cut, span.style));
        }
        break;
    }
    out.push(Span::styled("…", Theme::text_dim()));
    out
}
