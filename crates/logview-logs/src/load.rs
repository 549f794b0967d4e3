use std::sync::Arc;

use tracing::debug;

use logview_types::ArcLogEntry;

use crate::parser::{Discarded, LogParser};

/// A line that did not produce an entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscardedLine {
    /// 1-based line number
    pub line_number: usize,
    pub reason: Discarded,
}

/// Result of parsing a complete log text
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    /// Parsed entries in input order
    pub entries: Vec<ArcLogEntry>,

    /// Malformed lines, in input order
    pub discarded: Vec<DiscardedLine>,

    /// Number of blank lines skipped
    pub blank_lines: usize,
}

impl LoadReport {
    /// Number of lines that were rejected as malformed
    pub fn malformed_count(&self) -> usize {
        self.discarded.len()
    }
}

/// Parse every line of a log text
///
/// Parsing is strictly line-local: a malformed line is recorded and skipped,
/// its neighbours are unaffected.
pub fn load(text: &str) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, line) in text.split('\n').enumerate() {
        let line_number = idx + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);

        match LogParser::parse(line, line_number) {
            Ok(entry) => report.entries.push(Arc::new(entry)),
            Err(Discarded::Blank) => report.blank_lines += 1,
            Err(reason) => {
                debug!("Skipping line {}: {}", line_number, reason);
                report.discarded.push(DiscardedLine {
                    line_number,
                    reason,
                });
            }
        }
    }

    debug!(
        "Loaded {} entries ({} malformed, {} blank)",
        report.entries.len(),
        report.discarded.len(),
        report.blank_lines
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_around_one_record() {
        let report = load("\n   \n{}\n");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].line_number, 3);
        assert!(report.discarded.is_empty());
        assert_eq!(report.blank_lines, 3);
    }

    #[test]
    fn test_garbage_does_not_disturb_neighbours() {
        let text = [
            r#"{"logLevel":"info","argumentsArray":["first"]}"#,
            "garbage {{{",
            r#"{"logLevel":"warn","argumentsArray":["second"]}"#,
            "{\"unterminated\": ",
            r#"{"logLevel":"error","argumentsArray":["third"]}"#,
        ]
        .join("\n");

        let report = load(&text);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.malformed_count(), 2);
        assert_eq!(report.discarded[0].line_number, 2);
        assert_eq!(report.discarded[1].line_number, 4);

        let raws: Vec<&str> = report
            .entries
            .iter()
            .map(|e| e.arguments[0].raw.as_str())
            .collect();
        assert_eq!(raws, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_entry_count_matches_valid_lines() {
        let valid = r#"{"date":"2024-01-01","argumentsArray":["x"]}"#;
        let lines = [valid, "]", valid, "", "nope", valid, "{", valid];
        let report = load(&lines.join("\n"));
        assert_eq!(report.entries.len(), 4);
        for entry in &report.entries {
            assert_eq!(entry.timestamp, "2024-01-01");
            assert_eq!(entry.arguments[0].raw, "x");
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let report = load("{\"logLevel\":\"info\"}\r\n{\"logLevel\":\"debug\"}\r\n");
        assert_eq!(report.entries.len(), 2);
        assert!(report.discarded.is_empty());
    }

    #[test]
    fn test_input_order_is_preserved() {
        let text = (1..=5)
            .map(|i| format!(r#"{{"date":"t{i}"}}"#))
            .collect::<Vec<_>>()
            .join("\n");
        let report = load(&text);
        let stamps: Vec<&str> = report.entries.iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["t1", "t2", "t3", "t4", "t5"]);
    }
}
