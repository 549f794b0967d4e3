//! Shared types for logview
//!
//! This crate contains the record, argument and token types used across the
//! logview crates.

use std::sync::Arc;

use ratatui::style::Color;

// ============================================================================
// Log Types
// ============================================================================

/// Style bucket for a record's level
///
/// The vocabulary is closed: anything outside it lands in `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    Silly,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    #[default]
    Unknown,
}

impl LogLevel {
    /// Every bucket, in display order
    pub const ALL: [LogLevel; 8] = [
        Self::Silly,
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Unknown,
    ];

    /// Map a level string onto its bucket (case-insensitive exact match)
    pub fn from_label(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "silly" => Self::Silly,
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    /// Get terminal color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::Silly => Color::LightMagenta,
            Self::Trace => Color::Green,
            Self::Debug => Color::Blue,
            Self::Info => Color::Cyan,
            Self::Warn => Color::Yellow,
            Self::Error => Color::LightRed,
            Self::Fatal => Color::Red,
            Self::Unknown => Color::White,
        }
    }

    /// Bucket name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silly => "silly",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Unknown => "unknown",
        }
    }

    /// Short display string (3 chars)
    pub fn short(&self) -> &'static str {
        match self {
            Self::Silly => "SLY",
            Self::Trace => "TRC",
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warn => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
            Self::Unknown => "???",
        }
    }

    /// CSS class used by the HTML document
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Silly => "log-level-silly",
            Self::Trace => "log-level-trace",
            Self::Debug => "log-level-debug",
            Self::Info => "log-level-info",
            Self::Warn => "log-level-warn",
            Self::Error => "log-level-error",
            Self::Fatal => "log-level-fatal",
            Self::Unknown => "log-level-unknown",
        }
    }
}

/// Where a record was emitted from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    /// Whether there is anything to link to
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Label as `path[:line[:column]]`, or an empty string without a path
    ///
    /// The column is only shown when a line is present.
    pub fn label(&self) -> String {
        if self.path.is_empty() {
            return String::new();
        }
        match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{}:{}:{}", self.path, line, column),
            (Some(line), None) => format!("{}:{}", self.path, line),
            (None, _) => self.path.clone(),
        }
    }
}

/// Classification of an argument
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentKind {
    PlainText,
    JsonValue(serde_json::Value),
}

/// One positional value attached to a record
#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    /// The token exactly as it appeared in the record
    pub raw: String,
    pub kind: ArgumentKind,
}

impl Argument {
    /// Classify raw text: anything that parses as JSON is a JSON value,
    /// everything else is plain text.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => ArgumentKind::JsonValue(value),
            Err(_) => ArgumentKind::PlainText,
        };
        Self { raw, kind }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.kind, ArgumentKind::JsonValue(_))
    }
}

/// A single parsed log record
///
/// Records are shared as [`ArcLogEntry`] once parsed and never mutated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogEntry {
    /// 1-based line number within the loaded text
    pub line_number: usize,

    /// Timestamp text, displayed verbatim
    pub timestamp: String,

    /// Level as written in the record
    pub level_text: String,

    /// Style bucket derived from `level_text`
    pub level: LogLevel,

    pub source: SourceLocation,

    pub function_name: String,

    pub arguments: Vec<Argument>,
}

impl LogEntry {
    /// Create an entry with every field defaulted
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            ..Self::default()
        }
    }

    /// Set the level text and its bucket together
    pub fn with_level(mut self, level_text: impl Into<String>) -> Self {
        self.level_text = level_text.into();
        self.level = LogLevel::from_label(&self.level_text);
        self
    }
}

/// Shared handle to an immutable entry
pub type ArcLogEntry = Arc<LogEntry>;

// ============================================================================
// Highlighting Types
// ============================================================================

/// Syntactic category of a highlighted JSON token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Key,
    String,
    Number,
    Boolean,
    Null,
    /// Braces, brackets, commas, colons and whitespace
    Structural,
}

impl TokenCategory {
    /// CSS class for the category (structural text is left unwrapped)
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Key => Some("key"),
            Self::String => Some("string"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Null => Some("null"),
            Self::Structural => None,
        }
    }

    /// Get terminal color for this category
    pub fn color(&self) -> Color {
        match self {
            Self::Key => Color::LightBlue,
            Self::String => Color::LightRed,
            Self::Number => Color::LightGreen,
            Self::Boolean | Self::Null => Color::Blue,
            Self::Structural => Color::Gray,
        }
    }
}

/// One classified slice of JSON text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonToken {
    pub text: String,
    pub category: TokenCategory,
}

impl JsonToken {
    pub fn new(text: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Rendering density of a JSON-valued argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ExpandState {
    #[default]
    Compact,
    Expanded,
}

impl ExpandState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Compact => Self::Expanded,
            Self::Expanded => Self::Compact,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Self::Expanded
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Expanded => "expanded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_buckets_are_case_insensitive() {
        assert_eq!(LogLevel::from_label("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::from_label("Silly"), LogLevel::Silly);
        assert_eq!(LogLevel::from_label("warn"), LogLevel::Warn);
    }

    #[test]
    fn test_level_requires_exact_match() {
        assert_eq!(LogLevel::from_label("warning"), LogLevel::Unknown);
        assert_eq!(LogLevel::from_label(""), LogLevel::Unknown);
        assert_eq!(LogLevel::from_label(" info"), LogLevel::Unknown);
    }

    #[test]
    fn test_source_label() {
        assert_eq!(SourceLocation::new("a.js", Some(10), None).label(), "a.js:10");
        assert_eq!(SourceLocation::new("a.js", Some(10), Some(4)).label(), "a.js:10:4");
        assert_eq!(SourceLocation::new("a.js", None, Some(4)).label(), "a.js");
        assert_eq!(SourceLocation::new("", Some(1), Some(1)).label(), "");
    }

    #[test]
    fn test_argument_classification() {
        assert!(Argument::classify(r#"{"x":1}"#).is_json());
        assert!(Argument::classify("42").is_json());
        assert!(!Argument::classify("boom").is_json());
        assert!(!Argument::classify("{broken").is_json());
    }

    #[test]
    fn test_expand_state_toggle() {
        let state = ExpandState::default();
        assert_eq!(state, ExpandState::Compact);
        assert_eq!(state.toggled(), ExpandState::Expanded);
        assert_eq!(state.toggled().toggled(), state);
    }
}
