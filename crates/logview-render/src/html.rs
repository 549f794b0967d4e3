//! Self-contained HTML output for a presentation document

use std::fmt::Write as _;

use crate::document::PresentationDocument;
use crate::escape::escape_html;

/// Stylesheet embedded in every document
const STYLESHEET: &str = include_str!("assets/viewer.css");

/// Behavior module embedded in every document. It is the same for every
/// document; all per-document data travels in attributes.
const BEHAVIOR: &str = include_str!("assets/viewer.js");

pub const DEFAULT_TITLE: &str = "Log Viewer";

/// Knobs for the generated page
#[derive(Clone, Debug)]
pub struct HtmlOptions {
    pub title: String,
    /// State of the global toggle when the page is written
    pub all_expanded: bool,
    /// Script nonce for hosts that enforce a content security policy
    pub nonce: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            all_expanded: false,
            nonce: None,
        }
    }
}

/// Write the complete page: toolbar, entries, style and behavior
pub fn render_html(document: &PresentationDocument, options: &HtmlOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "<!doctype html>");
    let _ = writeln!(&mut out, "<html lang=\"en\">");
    let _ = writeln!(&mut out, "<head>");
    let _ = writeln!(&mut out, "<meta charset=\"utf-8\">");
    if let Some(nonce) = &options.nonce {
        let _ = writeln!(
            &mut out,
            "<meta http-equiv=\"Content-Security-Policy\" content=\"default-src 'none'; style-src 'unsafe-inline'; script-src 'nonce-{}';\">",
            escape_html(nonce)
        );
    }
    let _ = writeln!(&mut out, "<title>{}</title>", escape_html(&options.title));
    let _ = writeln!(&mut out, "<style>\n{}</style>", STYLESHEET);
    let _ = writeln!(&mut out, "</head>");
    let _ = writeln!(
        &mut out,
        "<body data-indent=\"{}\">",
        document.renderer().indent()
    );

    write_toolbar(&mut out, document, options);

    let _ = writeln!(&mut out, "<main id=\"log-entries\">");
    for (idx, entry) in document.entries().iter().enumerate() {
        let _ = writeln!(&mut out, "{}", entry.to_html(idx));
    }
    let _ = writeln!(&mut out, "</main>");

    match &options.nonce {
        Some(nonce) => {
            let _ = writeln!(&mut out, "<script nonce=\"{}\">", escape_html(nonce));
        }
        None => {
            let _ = writeln!(&mut out, "<script>");
        }
    }
    let _ = writeln!(&mut out, "{}</script>", BEHAVIOR);
    let _ = writeln!(&mut out, "</body>");
    let _ = writeln!(&mut out, "</html>");
    out
}

fn write_toolbar(out: &mut String, document: &PresentationDocument, options: &HtmlOptions) {
    let _ = writeln!(out, "<header class=\"toolbar\">");
    let _ = writeln!(
        out,
        "<input id=\"filter\" type=\"search\" placeholder=\"Filter logs\" value=\"{}\" autocomplete=\"off\">",
        escape_html(document.filter().needle())
    );
    let _ = writeln!(
        out,
        "<button id=\"toggle-all\" type=\"button\" data-expanded=\"{}\">{}</button>",
        options.all_expanded,
        if options.all_expanded {
            "Collapse all"
        } else {
            "Expand all"
        }
    );

    let counts = document
        .level_counts()
        .non_zero()
        .into_iter()
        .map(|(level, count)| {
            format!(
                "<span class=\"{}\">{}</span> {}",
                level.css_class(),
                level.as_str(),
                count
            )
        })
        .collect::<Vec<_>>()
        .join(" · ");
    let _ = writeln!(
        out,
        "<span class=\"counts\">{} entries{}{}</span>",
        document.len(),
        if counts.is_empty() { "" } else { ": " },
        counts
    );

    if document.skipped_lines() > 0 {
        let _ = writeln!(
            out,
            "<span class=\"skipped\" title=\"Lines that are not JSON objects\">{} line{} skipped</span>",
            document.skipped_lines(),
            if document.skipped_lines() == 1 { "" } else { "s" }
        );
    }
    let _ = writeln!(out, "</header>");
}
