//! Presentation layer for logview
//!
//! Turns parsed entries into a presentation document, writes it out as a
//! self-contained HTML page, and provides the interaction controller that
//! drives expand/collapse, filtering and open-location requests against it.

mod argument;
mod bridge;
mod controller;
mod document;
mod escape;
mod html;
mod script_json;

pub use argument::{tokens_to_html, ArgumentRenderer, Fragment, DEFAULT_INDENT};
pub use bridge::{HostBridge, HostMessage};
pub use controller::{ElementId, ElementKind, InteractionController, Outcome, UiEvent};
pub use document::{DocumentAssembler, PresentationDocument, RenderedEntry};
pub use escape::{decode_payload, encode_payload, escape_html, PayloadError};
pub use html::{render_html, HtmlOptions, DEFAULT_TITLE};
