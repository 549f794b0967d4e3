//! Lexical highlighting of serialized JSON
//!
//! Works on the text rather than a parsed value so that whitespace and layout
//! chosen by the serializer survive untouched. Concatenating the `text` of
//! every token reproduces the input exactly.

use std::sync::LazyLock;

use regex::Regex;

use logview_types::{JsonToken, TokenCategory};

/// Strings (with an optional trailing colon marking a key), literals and numbers
const TOKEN_PATTERN: &str = r#""(?:\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(?P<colon>\s*:)?|\b(?:true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+\-]?\d+)?"#;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"));

/// Split JSON text into classified tokens
///
/// Text between matches (braces, commas, whitespace) becomes `Structural`.
/// Input that is not valid JSON still round-trips; it is just classified
/// less usefully.
pub fn highlight(json_text: &str) -> Vec<JsonToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(json_text) {
        let Some(m) = caps.get(0) else {
            continue;
        };

        push_token(&mut tokens, &json_text[last..m.start()], TokenCategory::Structural);

        let matched = m.as_str();
        if matched.starts_with('"') {
            match caps.name("colon") {
                Some(colon) => {
                    push_token(
                        &mut tokens,
                        &json_text[m.start()..colon.start()],
                        TokenCategory::Key,
                    );
                    push_token(&mut tokens, colon.as_str(), TokenCategory::Structural);
                }
                None => push_token(&mut tokens, matched, TokenCategory::String),
            }
        } else {
            let category = match matched {
                "true" | "false" => TokenCategory::Boolean,
                "null" => TokenCategory::Null,
                _ => TokenCategory::Number,
            };
            push_token(&mut tokens, matched, category);
        }

        last = m.end();
    }

    push_token(&mut tokens, &json_text[last..], TokenCategory::Structural);
    tokens
}

/// Append a token, merging runs of structural text
fn push_token(tokens: &mut Vec<JsonToken>, text: &str, category: TokenCategory) {
    if text.is_empty() {
        return;
    }
    if category == TokenCategory::Structural {
        if let Some(prev) = tokens.last_mut() {
            if prev.category == TokenCategory::Structural {
                prev.text.push_str(text);
                return;
            }
        }
    }
    tokens.push(JsonToken::new(text, category));
}

/// Concatenate token text back into the original input
pub fn reassemble(tokens: &[JsonToken]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
