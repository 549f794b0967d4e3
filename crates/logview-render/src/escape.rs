use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// Characters left alone by `encodeURIComponent`, so the behavior module can
/// decode payloads with `decodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors re-deriving a JSON fragment from its stored payload
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8 after decoding: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode raw argument text for a `data-json` attribute
pub fn encode_payload(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Reverse of [`encode_payload`]
pub fn decode_payload(payload: &str) -> Result<Cow<'_, str>, PayloadError> {
    Ok(percent_decode_str(payload).decode_utf8()?)
}
