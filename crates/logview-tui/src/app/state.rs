use std::time::{Duration, Instant};

use logview_render::{
    ElementId, ElementKind, InteractionController, Outcome, RenderedEntry, UiEvent,
};

use super::Action;

/// How long a status message stays up
const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Display switches that can come from configuration
#[derive(Clone, Copy, Debug)]
pub struct ViewerOptions {
    pub show_timestamps: bool,
    pub show_function_names: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            show_function_names: true,
        }
    }
}

/// Transient message shown in the status line
#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub text: String,
    shown_at: Instant,
}

/// UI-specific transient state
pub struct UiState {
    /// Is search/filter bar active?
    pub search_active: bool,

    /// Current filter text; every edit is applied immediately
    pub search_input: String,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Message to display (if any)
    pub message: Option<StatusMessage>,

    /// Position of the cursor among visible entries
    pub cursor: usize,

    /// Selected JSON argument within the cursor entry
    pub selected_argument: usize,

    /// First visible entry in the viewport (index among visible entries)
    pub scroll: usize,

    /// Entries that fit on the last rendered page
    pub page_size: usize,

    /// Show timestamps in log viewer?
    pub show_timestamps: bool,

    /// Show function names in log viewer?
    pub show_function_names: bool,

    /// Show level statistics bar?
    pub stats_visible: bool,
}

impl UiState {
    fn new(options: ViewerOptions) -> Self {
        Self {
            search_active: false,
            search_input: String::new(),
            help_visible: false,
            message: None,
            cursor: 0,
            selected_argument: 0,
            scroll: 0,
            page_size: 10,
            show_timestamps: options.show_timestamps,
            show_function_names: options.show_function_names,
            stats_visible: false,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Owner of the document and all interaction state
    pub controller: InteractionController,

    /// Name of the loaded file, for the header
    pub source_name: String,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(
        controller: InteractionController,
        source_name: impl Into<String>,
        options: ViewerOptions,
    ) -> Self {
        Self {
            controller,
            source_name: source_name.into(),
            ui_state: UiState::new(options),
            should_quit: false,
            render_dirty: true, // Start dirty to ensure initial render
        }
    }

    /// Apply one action; returns true when the screen needs a redraw
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.ui_state.help_visible = !self.ui_state.help_visible,
            Action::ToggleTimestamps => {
                self.ui_state.show_timestamps = !self.ui_state.show_timestamps
            }
            Action::ToggleFunctionNames => {
                self.ui_state.show_function_names = !self.ui_state.show_function_names
            }
            Action::ToggleStats => self.ui_state.stats_visible = !self.ui_state.stats_visible,
            Action::CursorUp(n) => self.cursor_up(n),
            Action::CursorDown(n) => self.cursor_down(n),
            Action::PageUp => self.cursor_up(self.ui_state.page_size.max(1)),
            Action::PageDown => self.cursor_down(self.ui_state.page_size.max(1)),
            Action::CursorToTop => self.set_cursor(0),
            Action::CursorToBottom => self.set_cursor(usize::MAX),
            Action::NextArgument => self.cycle_argument(true),
            Action::PrevArgument => self.cycle_argument(false),
            Action::ToggleArgument => self.toggle_selected_argument(),
            Action::ToggleAll => {
                self.controller.handle(UiEvent::ToggleAll);
            }
            Action::OpenSource => self.open_selected_source(),
            Action::OpenSearch => self.start_search(),
            Action::ApplySearch => self.ui_state.search_active = false,
            Action::CloseSearch => self.cancel_search(),
            Action::SearchInput(c) => self.search_input_char(c),
            Action::SearchBackspace => self.search_input_backspace(),
            Action::SearchClear => self.set_search_input(String::new()),
            Action::ClearFilter => self.clear_filter(),
            Action::ShowMessage(text) => self.show_message(text),
            Action::DismissMessage => self.ui_state.message = None,
            Action::Tick => return self.expire_message(),
            Action::Render => {}
        }
        true
    }

    /// Document indices of entries passing the filter
    pub fn visible_indices(&self) -> Vec<usize> {
        self.controller
            .document()
            .visible()
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Document index of the entry under the cursor
    pub fn selected_entry(&self) -> Option<usize> {
        self.visible_indices().get(self.ui_state.cursor).copied()
    }

    pub fn selected_rendered(&self) -> Option<&RenderedEntry> {
        self.selected_entry()
            .and_then(|idx| self.controller.document().entry(idx))
    }

    /// Argument index of the selected JSON argument in the cursor entry
    pub fn selected_argument_index(&self) -> Option<usize> {
        let id = self.selected_json_element()?;
        match self.controller.kind(id)? {
            ElementKind::JsonArgument { argument, .. } => Some(argument),
            ElementKind::SourceLink { .. } => None,
        }
    }

    fn selected_json_element(&self) -> Option<ElementId> {
        let entry = self.selected_entry()?;
        self.controller
            .json_elements_of(entry)
            .get(self.ui_state.selected_argument)
            .copied()
    }

    fn set_cursor(&mut self, position: usize) {
        let len = self.visible_indices().len();
        let clamped = position.min(len.saturating_sub(1));
        if clamped != self.ui_state.cursor {
            self.ui_state.selected_argument = 0;
        }
        self.ui_state.cursor = clamped;
    }

    fn cursor_up(&mut self, n: usize) {
        self.set_cursor(self.ui_state.cursor.saturating_sub(n));
    }

    fn cursor_down(&mut self, n: usize) {
        self.set_cursor(self.ui_state.cursor.saturating_add(n));
    }

    fn cycle_argument(&mut self, forward: bool) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let count = self.controller.json_elements_of(entry).len();
        if count == 0 {
            return;
        }
        let current = self.ui_state.selected_argument.min(count - 1);
        self.ui_state.selected_argument = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
    }

    fn toggle_selected_argument(&mut self) {
        if let Some(id) = self.selected_json_element() {
            self.controller.handle(UiEvent::Activate(id));
        }
    }

    fn open_selected_source(&mut self) {
        let target = self
            .selected_entry()
            .and_then(|entry| self.controller.source_element(entry));
        match target {
            Some(id) => {
                if self.controller.handle(UiEvent::Activate(id)) == Outcome::OpenRequested {
                    if let Some(label) = self.selected_rendered().and_then(|e| e.source_label()) {
                        self.show_message(format!("Opening {}", label));
                    }
                }
            }
            None => self.show_message("No source location for this entry".to_string()),
        }
    }

    /// Start search/filter input mode, editing the current filter
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
    }

    /// Leave filter input and show everything again
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.set_search_input(String::new());
    }

    /// Clear the active filter
    pub fn clear_filter(&mut self) {
        self.set_search_input(String::new());
    }

    /// Add a character to search input
    pub fn search_input_char(&mut self, c: char) {
        let mut input = self.ui_state.search_input.clone();
        input.push(c);
        self.set_search_input(input);
    }

    /// Remove last character from search input
    pub fn search_input_backspace(&mut self) {
        let mut input = self.ui_state.search_input.clone();
        input.pop();
        self.set_search_input(input);
    }

    /// Every change to the input is a filter event
    fn set_search_input(&mut self, input: String) {
        self.controller
            .handle(UiEvent::FilterChanged(input.clone()));
        self.ui_state.search_input = input;
        self.set_cursor(self.ui_state.cursor);
    }

    /// Show a status message
    pub fn show_message(&mut self, text: String) {
        self.ui_state.message = Some(StatusMessage {
            text,
            shown_at: Instant::now(),
        });
    }

    fn expire_message(&mut self) -> bool {
        match &self.ui_state.message {
            Some(msg) if msg.shown_at.elapsed() >= MESSAGE_TTL => {
                self.ui_state.message = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_logs::load;
    use logview_render::{DocumentAssembler, HostBridge, HostMessage};
    use logview_types::ExpandState;
    use tokio::sync::mpsc::UnboundedReceiver;

    const SAMPLE: &str = concat!(
        r#"{"logLevel":"info","argumentsArray":["Server started","{\"port\":3000}"]}"#,
        "\n",
        r#"{"logLevel":"warn","filePath":"x.ts","lineNumber":5,"columnNumber":3,"argumentsArray":["High memory usage","{\"memory\":\"85%\"}","[1,2]"]}"#,
        "\n",
        r#"{"logLevel":"error","argumentsArray":["Database connection failed"]}"#,
    );

    fn state() -> (AppState, UnboundedReceiver<HostMessage>) {
        let document = DocumentAssembler::default().assemble_report(&load(SAMPLE));
        let (bridge, rx) = HostBridge::channel();
        let controller = InteractionController::new(document, bridge);
        (
            AppState::new(controller, "sample.log", ViewerOptions::default()),
            rx,
        )
    }

    #[test]
    fn test_cursor_is_clamped() {
        let (mut state, _rx) = state();
        state.apply(Action::CursorDown(10));
        assert_eq!(state.ui_state.cursor, 2);
        state.apply(Action::CursorUp(1));
        assert_eq!(state.selected_entry(), Some(1));
        state.apply(Action::CursorToTop);
        assert_eq!(state.selected_entry(), Some(0));
    }

    #[test]
    fn test_typing_filters_live() {
        let (mut state, _rx) = state();
        state.apply(Action::CursorToBottom);
        state.apply(Action::OpenSearch);
        for c in "memory".chars() {
            state.apply(Action::SearchInput(c));
        }
        assert_eq!(state.visible_indices(), vec![1]);
        assert_eq!(state.ui_state.cursor, 0);
        assert_eq!(state.controller.document().filter().needle(), "memory");

        state.apply(Action::ApplySearch);
        assert!(!state.ui_state.search_active);
        assert_eq!(state.visible_indices(), vec![1]);

        state.apply(Action::ClearFilter);
        assert_eq!(state.visible_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_escape_clears_filter() {
        let (mut state, _rx) = state();
        state.apply(Action::OpenSearch);
        state.apply(Action::SearchInput('z'));
        assert!(state.visible_indices().is_empty());
        state.apply(Action::CloseSearch);
        assert_eq!(state.visible_indices().len(), 3);
    }

    #[test]
    fn test_toggle_selected_argument() {
        let (mut state, _rx) = state();
        state.apply(Action::CursorDown(1));
        state.apply(Action::NextArgument);
        assert_eq!(state.selected_argument_index(), Some(2));
        state.apply(Action::ToggleArgument);

        let entry = &state.controller.document().entries()[1];
        assert_eq!(entry.fragments()[1].state(), ExpandState::Compact);
        assert_eq!(entry.fragments()[2].state(), ExpandState::Expanded);
    }

    #[test]
    fn test_argument_cycle_wraps() {
        let (mut state, _rx) = state();
        state.apply(Action::CursorDown(1));
        state.apply(Action::PrevArgument);
        assert_eq!(state.selected_argument_index(), Some(2));
        state.apply(Action::NextArgument);
        assert_eq!(state.selected_argument_index(), Some(1));
    }

    #[test]
    fn test_open_source_reaches_host() {
        let (mut state, mut rx) = state();
        state.apply(Action::CursorDown(1));
        state.apply(Action::OpenSource);
        assert_eq!(rx.try_recv().unwrap(), HostMessage::open_file("x.ts", Some(5), Some(3)));
        assert!(state.ui_state.message.is_some());
    }

    #[test]
    fn test_open_source_without_location() {
        let (mut state, mut rx) = state();
        state.apply(Action::OpenSource);
        assert!(rx.try_recv().is_err());
        assert_eq!(
            state.ui_state.message.as_ref().map(|m| m.text.as_str()),
            Some("No source location for this entry")
        );
    }

    #[test]
    fn test_tick_keeps_fresh_message() {
        let (mut state, _rx) = state();
        state.apply(Action::ShowMessage("hello".to_string()));
        assert!(!state.apply(Action::Tick));
        assert!(state.ui_state.message.is_some());
    }
}
