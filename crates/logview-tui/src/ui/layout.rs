use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Areas of the viewer screen; optional bars are None when hidden
pub struct ViewerAreas {
    pub header: Rect,
    pub stats: Option<Rect>,
    pub filter: Option<Rect>,
    pub entries: Rect,
    pub status: Rect,
}

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Header, optional stats and filter bars, entries, status bar
    pub fn viewer(area: Rect, show_stats: bool, show_filter: bool) -> ViewerAreas {
        let mut constraints = vec![Constraint::Length(3)]; // Header always
        if show_stats {
            constraints.push(Constraint::Length(3));
        }
        if show_filter {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(1)); // Entries
        constraints.push(Constraint::Length(1)); // Status bar

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        let mut next = || {
            let rect = chunks[idx];
            idx += 1;
            rect
        };

        let header = next();
        let stats = show_stats.then(&mut next);
        let filter = show_filter.then(&mut next);
        let entries = next();
        let status = next();

        ViewerAreas {
            header,
            stats,
            filter,
            entries,
            status,
        }
    }

    /// A centered popup of at most the given size
    pub fn popup(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width.saturating_sub(4));
        let height = height.min(area.height.saturating_sub(4));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }
}
