//! Rendering of a single argument into a presentation fragment

use serde_json::Value;

use logview_logs::highlight;
use logview_types::{Argument, ArgumentKind, ExpandState, JsonToken};

use crate::escape::{decode_payload, encode_payload, escape_html, PayloadError};
use crate::script_json;

/// Default indentation of the expanded form
pub const DEFAULT_INDENT: usize = 4;

/// Rendered form of one argument
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// Shown as escaped text, never highlighted
    Plain { text: String },

    /// Highlighted JSON in one of two densities
    Json {
        /// URI-encoded original argument text
        payload: String,
        state: ExpandState,
        /// Serialization currently on display
        display: String,
        tokens: Vec<JsonToken>,
    },
}

impl Fragment {
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json { .. })
    }

    /// Current density (plain text is always compact)
    pub fn state(&self) -> ExpandState {
        match self {
            Self::Plain { .. } => ExpandState::Compact,
            Self::Json { state, .. } => *state,
        }
    }

    /// Text as displayed
    pub fn text(&self) -> &str {
        match self {
            Self::Plain { text } => text,
            Self::Json { display, .. } => display,
        }
    }

    /// Stored payload of a JSON fragment
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Plain { .. } => None,
            Self::Json { payload, .. } => Some(payload),
        }
    }

    pub fn tokens(&self) -> &[JsonToken] {
        match self {
            Self::Plain { .. } => &[],
            Self::Json { tokens, .. } => tokens,
        }
    }

    /// Markup for this fragment
    pub fn to_html(&self) -> String {
        match self {
            Self::Plain { text } => format!("<span class=\"log-arg\">{}</span>", escape_html(text)),
            Self::Json {
                payload,
                state,
                tokens,
                ..
            } => format!(
                "<span class=\"log-json {state}\" data-json=\"{payload}\" data-state=\"{state}\">{body}</span>",
                state = state.as_str(),
                payload = payload,
                body = tokens_to_html(tokens),
            ),
        }
    }
}

/// Wrap each classified token in a span; structural text is only escaped
///
/// Escaping happens per token, so markup in the JSON text can never leak
/// into the output.
pub fn tokens_to_html(tokens: &[JsonToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = escape_html(&token.text);
        match token.category.css_class() {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(&text);
                out.push_str("</span>");
            }
            None => out.push_str(&text),
        }
    }
    out
}

/// Turns arguments into fragments
#[derive(Clone, Debug)]
pub struct ArgumentRenderer {
    indent: usize,
}

impl Default for ArgumentRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl ArgumentRenderer {
    /// Create a renderer whose expanded form uses `indent` spaces (1..=8)
    pub fn new(indent: usize) -> Self {
        Self {
            indent: indent.clamp(1, 8),
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Render an argument in the given density
    pub fn render(&self, argument: &Argument, state: ExpandState) -> Fragment {
        match &argument.kind {
            ArgumentKind::PlainText => Fragment::Plain {
                text: argument.raw.clone(),
            },
            ArgumentKind::JsonValue(value) => {
                self.json_fragment(encode_payload(&argument.raw), value, state)
            }
        }
    }

    /// Re-derive a JSON fragment from its stored payload
    ///
    /// Only the payload is consulted; the displayed markup is never parsed.
    pub fn rerender(&self, payload: &str, state: ExpandState) -> Result<Fragment, PayloadError> {
        let raw = decode_payload(payload)?;
        let value: Value = serde_json::from_str(&raw)?;
        Ok(self.json_fragment(payload.to_string(), &value, state))
    }

    /// Serialize a value in the given density
    ///
    /// Output matches the page script's `JSON.stringify(value)` and
    /// `JSON.stringify(value, null, indent)` character for character.
    pub fn serialize(&self, value: &Value, state: ExpandState) -> String {
        let text = match state {
            ExpandState::Compact => script_json::to_compact(value),
            ExpandState::Expanded => script_json::to_pretty(value, &" ".repeat(self.indent)),
        };
        text.unwrap_or_else(|| value.to_string())
    }

    fn json_fragment(&self, payload: String, value: &Value, state: ExpandState) -> Fragment {
        let display = self.serialize(value, state);
        let tokens = highlight(&display);
        Fragment::Json {
            payload,
            state,
            display,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logview_types::TokenCategory;

    #[test]
    fn test_plain_text_is_escaped_not_highlighted() {
        let renderer = ArgumentRenderer::default();
        let fragment = renderer.render(&Argument::classify("<b>boom</b>"), ExpandState::Compact);
        assert!(!fragment.is_json());
        assert_eq!(
            fragment.to_html(),
            "<span class=\"log-arg\">&lt;b&gt;boom&lt;/b&gt;</span>"
        );
    }

    #[test]
    fn test_compact_json_highlights_key_and_number() {
        let renderer = ArgumentRenderer::default();
        let fragment = renderer.render(&Argument::classify(r#"{"x":1}"#), ExpandState::Compact);
        assert_eq!(fragment.text(), r#"{"x":1}"#);
        let tokens = fragment.tokens();
        assert!(tokens.contains(&JsonToken::new("\"x\"", TokenCategory::Key)));
        assert!(tokens.contains(&JsonToken::new("1", TokenCategory::Number)));
        assert_eq!(
            fragment.to_html(),
            "<span class=\"log-json compact\" data-json=\"%7B%22x%22%3A1%7D\" data-state=\"compact\">{<span class=\"key\">&quot;x&quot;</span>:<span class=\"number\">1</span>}</span>"
        );
    }

    #[test]
    fn test_expanded_uses_configured_indent() {
        let renderer = ArgumentRenderer::new(2);
        let fragment = renderer.render(&Argument::classify(r#"{"a":[1]}"#), ExpandState::Expanded);
        assert_eq!(fragment.text(), "{\n  \"a\": [\n    1\n  ]\n}");
        assert_eq!(fragment.state(), ExpandState::Expanded);
    }

    #[test]
    fn test_default_indent_is_four_spaces() {
        let renderer = ArgumentRenderer::default();
        let value: Value = serde_json::from_str(r#"{"port":3000}"#).unwrap();
        assert_eq!(
            renderer.serialize(&value, ExpandState::Expanded),
            "{\n    \"port\": 3000\n}"
        );
    }

    #[test]
    fn test_compact_preserves_key_order() {
        let renderer = ArgumentRenderer::default();
        let fragment = renderer.render(&Argument::classify(r#"{ "z": 1, "a": 2 }"#), ExpandState::Compact);
        assert_eq!(fragment.text(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_payload_keeps_original_text() {
        let raw = r#"{ "spaced" : true }"#;
        let renderer = ArgumentRenderer::default();
        let fragment = renderer.render(&Argument::classify(raw), ExpandState::Compact);
        let payload = fragment.payload().unwrap();
        assert_eq!(decode_payload(payload).unwrap(), raw);
    }

    #[test]
    fn test_rerender_is_byte_identical() {
        let renderer = ArgumentRenderer::default();
        let original = renderer.render(
            &Argument::classify(r#"{"error":"timeout","stack":["a","b"]}"#),
            ExpandState::Compact,
        );
        let payload = original.payload().unwrap();
        let expanded = renderer.rerender(payload, ExpandState::Expanded).unwrap();
        assert_ne!(expanded.to_html(), original.to_html());
        let collapsed = renderer
            .rerender(expanded.payload().unwrap(), ExpandState::Compact)
            .unwrap();
        assert_eq!(collapsed.to_html(), original.to_html());
        assert_eq!(collapsed, original);
    }

    #[test]
    fn test_fractional_zero_round_trips_like_the_page() {
        let renderer = ArgumentRenderer::default();
        let original = renderer.render(&Argument::classify(r#"{"a":1.0,"b":1e5}"#), ExpandState::Compact);
        assert_eq!(original.text(), r#"{"a":1,"b":100000}"#);

        let payload = original.payload().unwrap();
        let expanded = renderer.rerender(payload, ExpandState::Expanded).unwrap();
        assert_eq!(expanded.text(), "{\n    \"a\": 1,\n    \"b\": 100000\n}");
        let collapsed = renderer.rerender(payload, ExpandState::Compact).unwrap();
        assert_eq!(collapsed.to_html(), original.to_html());
    }

    #[test]
    fn test_rerender_rejects_bad_payload() {
        let renderer = ArgumentRenderer::default();
        assert!(renderer.rerender("%7Bnot", ExpandState::Compact).is_err());
        assert!(renderer.rerender("%FF", ExpandState::Compact).is_err());
    }

    #[test]
    fn test_markup_inside_json_is_escaped() {
        let renderer = ArgumentRenderer::default();
        let fragment =
            renderer.render(&Argument::classify(r#"{"html":"<img src=x>"}"#), ExpandState::Compact);
        let html = fragment.to_html();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;"));
    }
}
