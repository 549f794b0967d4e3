//! Assembly of parsed entries into a presentation document

use logview_logs::{LevelCounts, LoadReport, TextFilter};
use logview_types::{ArcLogEntry, ExpandState};

use crate::argument::{ArgumentRenderer, Fragment};
use crate::escape::escape_html;

/// One entry as presented, with its per-argument render state
#[derive(Clone, Debug)]
pub struct RenderedEntry {
    entry: ArcLogEntry,
    fragments: Vec<Fragment>,
    /// Density-independent text the filter runs against
    search_text: String,
    visible: bool,
}

impl RenderedEntry {
    fn new(entry: ArcLogEntry, renderer: &ArgumentRenderer) -> Self {
        let fragments: Vec<Fragment> = entry
            .arguments
            .iter()
            .map(|arg| renderer.render(arg, ExpandState::Compact))
            .collect();
        let search_text = Self::build_search_text(&entry, &fragments);

        Self {
            entry,
            fragments,
            search_text,
            visible: true,
        }
    }

    /// Timestamp, level, source label, function name and arguments,
    /// separated by spaces, with JSON in its compact form
    fn build_search_text(entry: &ArcLogEntry, fragments: &[Fragment]) -> String {
        let label = entry.source.label();
        let head = [
            entry.timestamp.as_str(),
            entry.level_text.as_str(),
            label.as_str(),
            entry.function_name.as_str(),
        ];
        head.into_iter()
            .chain(fragments.iter().map(Fragment::text))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn entry(&self) -> &ArcLogEntry {
        &self.entry
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Label of the clickable source reference (None without a path)
    pub fn source_label(&self) -> Option<String> {
        (!self.entry.source.is_empty()).then(|| self.entry.source.label())
    }

    pub(crate) fn fragment_mut(&mut self, index: usize) -> Option<&mut Fragment> {
        self.fragments.get_mut(index)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Markup for this entry
    pub fn to_html(&self, index: usize) -> String {
        let entry = &self.entry;
        let mut out = String::new();

        out.push_str(&format!("<div class=\"log-entry\" data-entry=\"{index}\""));
        if !self.visible {
            out.push_str(" hidden");
        }
        out.push('>');

        out.push_str(&format!(
            "<span class=\"log-date\">{}</span>",
            escape_html(&entry.timestamp)
        ));
        out.push_str(&format!(
            "<span class=\"log-level {}\">{}</span>",
            entry.level.css_class(),
            escape_html(&entry.level_text)
        ));

        out.push_str("<div class=\"log-message\">");
        if let Some(label) = self.source_label() {
            out.push_str(&format!(
                "<a class=\"log-source\" href=\"#\" data-path=\"{}\" data-line=\"{}\" data-column=\"{}\">{}</a>",
                escape_html(&entry.source.path),
                entry.source.line.map(|l| l.to_string()).unwrap_or_default(),
                entry.source.column.map(|c| c.to_string()).unwrap_or_default(),
                escape_html(&label)
            ));
        }
        if !entry.function_name.is_empty() {
            out.push_str(&format!(
                "<span class=\"log-function\">{}</span>",
                escape_html(&entry.function_name)
            ));
        }
        out.push_str("<span class=\"log-args\">");
        let args: Vec<String> = self.fragments.iter().map(Fragment::to_html).collect();
        out.push_str(&args.join(" "));
        out.push_str("</span></div></div>");

        out
    }
}

/// Ordered entries plus document-wide filter state
#[derive(Clone, Debug)]
pub struct PresentationDocument {
    entries: Vec<RenderedEntry>,
    filter: TextFilter,
    renderer: ArgumentRenderer,
    counts: LevelCounts,
    skipped_lines: usize,
}

impl PresentationDocument {
    pub fn entries(&self) -> &[RenderedEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&RenderedEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries currently passing the filter, with their document index
    pub fn visible(&self) -> impl Iterator<Item = (usize, &RenderedEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| e.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_visible()).count()
    }

    pub fn filter(&self) -> &TextFilter {
        &self.filter
    }

    pub fn renderer(&self) -> &ArgumentRenderer {
        &self.renderer
    }

    pub fn level_counts(&self) -> &LevelCounts {
        &self.counts
    }

    /// Malformed lines left out of the document
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut RenderedEntry> {
        self.entries.get_mut(index)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [RenderedEntry] {
        &mut self.entries
    }

    pub(crate) fn set_filter(&mut self, filter: TextFilter) {
        self.filter = filter;
    }
}

/// Builds presentation documents
#[derive(Clone, Debug, Default)]
pub struct DocumentAssembler {
    renderer: ArgumentRenderer,
}

impl DocumentAssembler {
    pub fn new(renderer: ArgumentRenderer) -> Self {
        Self { renderer }
    }

    /// One rendered entry per log entry, in input order, everything compact
    /// and visible
    pub fn assemble(&self, entries: &[ArcLogEntry]) -> PresentationDocument {
        let rendered = entries
            .iter()
            .map(|entry| RenderedEntry::new(entry.clone(), &self.renderer))
            .collect();

        PresentationDocument {
            entries: rendered,
            filter: TextFilter::default(),
            renderer: self.renderer.clone(),
            counts: LevelCounts::tally(entries.iter().map(|e| e.as_ref())),
            skipped_lines: 0,
        }
    }

    /// Assemble a loaded text, carrying its malformed-line count along
    pub fn assemble_report(&self, report: &LoadReport) -> PresentationDocument {
        let mut document = self.assemble(&report.entries);
        document.skipped_lines = report.malformed_count();
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_logs::load;

    fn document(text: &str) -> PresentationDocument {
        DocumentAssembler::default().assemble_report(&load(text))
    }

    #[test]
    fn test_error_record_scenario() {
        let doc = document(
            r#"{"logLevel":"error","filePath":"a.js","lineNumber":10,"argumentsArray":["boom"]}"#,
        );
        assert_eq!(doc.len(), 1);
        let entry = &doc.entries()[0];
        assert_eq!(entry.entry().level.css_class(), "log-level-error");
        assert_eq!(entry.source_label().as_deref(), Some("a.js:10"));
        assert_eq!(entry.fragments().len(), 1);
        assert!(!entry.fragments()[0].is_json());
        assert_eq!(entry.fragments()[0].text(), "boom");

        let html = entry.to_html(0);
        assert!(html.contains("class=\"log-level log-level-error\""));
        assert!(html.contains("data-path=\"a.js\" data-line=\"10\" data-column=\"\">a.js:10</a>"));
        assert!(html.contains("<span class=\"log-arg\">boom</span>"));
    }

    #[test]
    fn test_defaulted_entry_has_no_source_reference() {
        let doc = document("\n   \n{}\n");
        assert_eq!(doc.len(), 1);
        let entry = &doc.entries()[0];
        assert_eq!(entry.source_label(), None);
        assert!(entry.fragments().is_empty());
        assert_eq!(entry.search_text(), "");
        let html = entry.to_html(0);
        assert!(!html.contains("log-source"));
        assert!(html.contains("log-level-unknown"));
    }

    #[test]
    fn test_entries_keep_input_order() {
        let doc = document(
            "{\"date\":\"3\"}\n{\"date\":\"1\"}\nbad\n{\"date\":\"2\"}",
        );
        let stamps: Vec<&str> = doc
            .entries()
            .iter()
            .map(|e| e.entry().timestamp.as_str())
            .collect();
        assert_eq!(stamps, vec!["3", "1", "2"]);
        assert_eq!(doc.skipped_lines(), 1);
    }

    #[test]
    fn test_everything_starts_compact_and_visible() {
        let doc = document(
            "{\"argumentsArray\":[\"{\\\"a\\\":1}\",\"[1,2]\",\"text\"]}\n{\"argumentsArray\":[\"{}\"]}",
        );
        assert!(doc.filter().is_empty());
        assert_eq!(doc.visible_count(), 2);
        for entry in doc.entries() {
            assert!(entry
                .fragments()
                .iter()
                .all(|f| f.state() == ExpandState::Compact));
        }
    }

    #[test]
    fn test_search_text_joins_visible_parts() {
        let doc = document(
            r#"{"date":"2024-05-01 10:00","logLevel":"WARN","filePath":"src/app.ts","lineNumber":4,"columnNumber":2,"functionName":"main","argumentsArray":["High memory usage","{\"memory\": \"85%\"}"]}"#,
        );
        assert_eq!(
            doc.entries()[0].search_text(),
            r#"2024-05-01 10:00 WARN src/app.ts:4:2 main High memory usage {"memory":"85%"}"#
        );
    }

    #[test]
    fn test_level_counts() {
        let doc = document("{\"logLevel\":\"info\"}\n{\"logLevel\":\"info\"}\n{\"logLevel\":\"oops\"}");
        assert_eq!(doc.level_counts().info, 2);
        assert_eq!(doc.level_counts().unknown, 1);
    }

    #[test]
    fn test_entry_markup_escapes_fields() {
        let doc = document(r#"{"date":"<now>","functionName":"a&b","filePath":"x\"y.ts"}"#);
        let html = doc.entries()[0].to_html(0);
        assert!(html.contains("&lt;now&gt;"));
        assert!(html.contains("a&amp;b"));
        assert!(html.contains("data-path=\"x&quot;y.ts\""));
    }
}
