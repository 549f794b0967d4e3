//! Log processing for logview
//!
//! This crate provides record parsing, JSON highlighting, filtering and
//! level statistics.

mod filter;
pub mod highlight;
mod load;
mod parser;
mod stats;

pub use filter::TextFilter;
pub use highlight::highlight;
pub use load::{load, DiscardedLine, LoadReport};
pub use parser::{Discarded, LogParser};
pub use stats::LevelCounts;

// Re-export types used in our public API
pub use logview_types::{ArcLogEntry, Argument, ArgumentKind, JsonToken, LogEntry, LogLevel, TokenCategory};
