/// All possible actions in the viewer (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,

    // UI toggles
    ToggleHelp,
    ToggleTimestamps,
    ToggleFunctionNames,
    ToggleStats,

    // Cursor movement over visible entries
    CursorUp(usize),
    CursorDown(usize),
    PageUp,
    PageDown,
    CursorToTop,
    CursorToBottom,

    // JSON arguments
    NextArgument,
    PrevArgument,
    ToggleArgument,
    ToggleAll,

    // Source location
    OpenSource,

    // Filter input
    OpenSearch,
    ApplySearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ClearFilter,

    // Status line
    ShowMessage(String),
    DismissMessage,

    // Tick (for periodic updates)
    Tick,

    // Render request
    Render,
}
