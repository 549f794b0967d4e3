use serde_json::{Map, Value};
use thiserror::Error;

use logview_types::{Argument, LogEntry, SourceLocation};

/// Why a line did not produce an entry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Discarded {
    /// Empty or whitespace-only line; skipped without a diagnostic
    #[error("blank line")]
    Blank,

    /// Line is not a JSON object
    #[error("malformed line: {0}")]
    MalformedLine(String),
}

/// Record field names as written by the log producer
mod fields {
    pub const DATE: &str = "date";
    pub const LEVEL: &str = "logLevel";
    pub const FILE_PATH: &str = "filePath";
    pub const LINE: &str = "lineNumber";
    pub const COLUMN: &str = "columnNumber";
    pub const FUNCTION: &str = "functionName";
    pub const ARGUMENTS: &str = "argumentsArray";
}

/// Log parser for extracting structure from raw log lines
pub struct LogParser;

impl LogParser {
    /// Parse one line into a LogEntry
    ///
    /// Missing or mistyped fields fall back to their defaults; only a line
    /// that is not a JSON object is rejected.
    pub fn parse(line: &str, line_number: usize) -> Result<LogEntry, Discarded> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(Discarded::Blank);
        }

        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| Discarded::MalformedLine(e.to_string()))?;
        let Value::Object(obj) = value else {
            return Err(Discarded::MalformedLine(format!(
                "expected a JSON object, found {}",
                Self::kind_name(&value)
            )));
        };

        let source = SourceLocation::new(
            Self::text_field(&obj, fields::FILE_PATH),
            Self::position_field(&obj, fields::LINE),
            Self::position_field(&obj, fields::COLUMN),
        );

        Ok(LogEntry {
            line_number,
            timestamp: Self::text_field(&obj, fields::DATE),
            source,
            function_name: Self::text_field(&obj, fields::FUNCTION),
            arguments: Self::arguments(&obj),
            ..LogEntry::default()
        }
        .with_level(Self::text_field(&obj, fields::LEVEL)))
    }

    /// Extract a field as display text
    fn text_field(obj: &Map<String, Value>, key: &str) -> String {
        match obj.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Extract a positive line/column value, accepting numbers or numeric strings
    fn position_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
        let position = match obj.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }?;
        // Zero is what producers write when they have no position
        (position > 0).then_some(position)
    }

    /// Convert each argument independently
    fn arguments(obj: &Map<String, Value>) -> Vec<Argument> {
        match obj.get(fields::ARGUMENTS) {
            Some(Value::Array(items)) => items.iter().map(Self::argument).collect(),
            Some(other) => {
                tracing::trace!("ignoring non-array arguments field: {}", Self::kind_name(other));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn argument(value: &Value) -> Argument {
        match value {
            Value::String(s) => Argument::classify(s.as_str()),
            // Structured arguments keep their compact serialization as raw text
            other => Argument::classify(other.to_string()),
        }
    }

    fn kind_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_types::LogLevel;

    #[test]
    fn test_parse_full_record() {
        let line = r#"{"logLevel":"error","filePath":"a.js","lineNumber":10,"argumentsArray":["boom"]}"#;
        let entry = LogParser::parse(line, 1).unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.level_text, "error");
        assert_eq!(entry.source.label(), "a.js:10");
        assert_eq!(entry.arguments.len(), 1);
        assert_eq!(entry.arguments[0].raw, "boom");
        assert!(!entry.arguments[0].is_json());
    }

    #[test]
    fn test_parse_json_argument() {
        let line = r#"{"argumentsArray":["{\"x\":1}"]}"#;
        let entry = LogParser::parse(line, 1).unwrap();
        assert_eq!(entry.arguments.len(), 1);
        assert_eq!(entry.arguments[0].raw, r#"{"x":1}"#);
        assert!(entry.arguments[0].is_json());
    }

    #[test]
    fn test_parse_empty_object_defaults_everything() {
        let entry = LogParser::parse("{}", 3).unwrap();
        assert_eq!(entry.line_number, 3);
        assert_eq!(entry.timestamp, "");
        assert_eq!(entry.level, LogLevel::Unknown);
        assert!(entry.source.is_empty());
        assert_eq!(entry.source.label(), "");
        assert_eq!(entry.function_name, "");
        assert!(entry.arguments.is_empty());
    }

    #[test]
    fn test_blank_lines_are_not_malformed() {
        assert_eq!(LogParser::parse("", 1), Err(Discarded::Blank));
        assert_eq!(LogParser::parse("   \t", 1), Err(Discarded::Blank));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = LogParser::parse("not json at all", 1);
        assert!(matches!(result, Err(Discarded::MalformedLine(_))));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            LogParser::parse("[1,2,3]", 1),
            Err(Discarded::MalformedLine(_))
        ));
        assert!(matches!(
            LogParser::parse("null", 1),
            Err(Discarded::MalformedLine(_))
        ));
    }

    #[test]
    fn test_positions_tolerate_strings_and_zero() {
        let entry =
            LogParser::parse(r#"{"filePath":"x.ts","lineNumber":"5","columnNumber":0}"#, 1)
                .unwrap();
        assert_eq!(entry.source.line, Some(5));
        assert_eq!(entry.source.column, None);

        let entry = LogParser::parse(r#"{"filePath":"x.ts","lineNumber":-2}"#, 1).unwrap();
        assert_eq!(entry.source.line, None);
    }

    #[test]
    fn test_non_string_arguments_become_json() {
        let line = r#"{"argumentsArray":[{"a":[1,2]},7,"plain"]}"#;
        let entry = LogParser::parse(line, 1).unwrap();
        assert_eq!(entry.arguments.len(), 3);
        assert_eq!(entry.arguments[0].raw, r#"{"a":[1,2]}"#);
        assert!(entry.arguments[0].is_json());
        assert!(entry.arguments[1].is_json());
        assert!(!entry.arguments[2].is_json());
    }

    #[test]
    fn test_non_array_arguments_are_dropped() {
        let entry = LogParser::parse(r#"{"argumentsArray":"oops","logLevel":"info"}"#, 1).unwrap();
        assert!(entry.arguments.is_empty());
        assert_eq!(entry.level, LogLevel::Info);
    }

    #[test]
    fn test_level_text_is_kept_verbatim() {
        let entry = LogParser::parse(r#"{"logLevel":"WARN"}"#, 1).unwrap();
        assert_eq!(entry.level_text, "WARN");
        assert_eq!(entry.level, LogLevel::Warn);
    }
}
