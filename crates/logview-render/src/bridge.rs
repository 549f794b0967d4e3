//! Outbound channel to the host application

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Messages sent to the host. The host never replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "command")]
pub enum HostMessage {
    /// Ask the host to open a file at a 1-based position
    #[serde(rename = "openFile")]
    OpenFile {
        #[serde(rename = "filePath")]
        file_path: String,
        line: u32,
        column: u32,
    },
}

impl HostMessage {
    /// Build an open request; absent or zero positions become 1
    pub fn open_file(path: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self::OpenFile {
            file_path: path.into(),
            line: line.unwrap_or(1).max(1),
            column: column.unwrap_or(1).max(1),
        }
    }
}

/// Fire-and-forget sender of host messages
#[derive(Clone, Debug)]
pub struct HostBridge {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl HostBridge {
    /// Create a bridge and the receiver the host listens on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Ask the host to open a source location
    ///
    /// Never blocks and reports nothing back; if the host has gone away the
    /// request is dropped.
    pub fn request_open_location(&self, path: &str, line: Option<u32>, column: Option<u32>) {
        let message = HostMessage::open_file(path, line, column);
        if self.tx.send(message).is_err() {
            debug!("Host is not listening, dropped open request for {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let msg = HostMessage::open_file("x.ts", Some(5), Some(3));
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"command":"openFile","filePath":"x.ts","line":5,"column":3}"#
        );
    }

    #[test]
    fn test_absent_positions_default_to_first() {
        assert_eq!(
            HostMessage::open_file("a.js", None, None),
            HostMessage::OpenFile {
                file_path: "a.js".to_string(),
                line: 1,
                column: 1,
            }
        );
        assert_eq!(
            HostMessage::open_file("a.js", Some(0), Some(7)),
            HostMessage::OpenFile {
                file_path: "a.js".to_string(),
                line: 1,
                column: 7,
            }
        );
    }

    #[test]
    fn test_request_is_delivered() {
        let (bridge, mut rx) = HostBridge::channel();
        bridge.request_open_location("x.ts", Some(5), Some(3));
        assert_eq!(
            rx.try_recv().unwrap(),
            HostMessage::open_file("x.ts", Some(5), Some(3))
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_request_without_host_does_not_panic() {
        let (bridge, rx) = HostBridge::channel();
        drop(rx);
        bridge.request_open_location("x.ts", None, None);
    }
}
