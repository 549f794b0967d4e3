use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Periodic tick; expires status messages
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    Error(String),
}

impl Event {
    /// Events the viewer cares about; key releases and repeats are dropped
    /// (important for Windows), as are mouse and focus events
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            CrosstermEvent::Resize(w, h) => Some(Self::Resize(w, h)),
            _ => None,
        }
    }
}

/// Reads terminal input on a background task and forwards it as [`Event`]s
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(pump(sender, cancel.clone(), tick_rate));

        Self {
            receiver,
            cancel,
            task: Some(task),
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Stop the input task
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Stop the input task and wait until it no longer reads the terminal
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(sender: mpsc::UnboundedSender<Event>, cancel: CancellationToken, tick_rate: Duration) {
    let mut reader = EventStream::new();
    let mut ticks = tokio::time::interval(tick_rate);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => Some(Event::Tick),
            next = reader.next().fuse() => match next {
                Some(Ok(raw)) => Event::from_terminal(raw),
                Some(Err(e)) => Some(Event::Error(e.to_string())),
                None => break,
            },
        };

        if let Some(event) = event {
            if sender.send(event).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_presses_are_forwarded() {
        assert!(matches!(
            Event::from_terminal(key(KeyEventKind::Press)),
            Some(Event::Key(_))
        ));
        assert!(Event::from_terminal(key(KeyEventKind::Release)).is_none());
        assert!(Event::from_terminal(key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn test_resize_is_forwarded() {
        assert!(matches!(
            Event::from_terminal(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
        assert!(Event::from_terminal(CrosstermEvent::FocusGained).is_none());
    }
}
