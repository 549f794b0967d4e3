//! Terminal viewer event loop

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use logview_render::{HostMessage, InteractionController};
use logview_tui::{
    Action, AppState, Event, EventHandler, KeyBindings, KeyContext, LogViewerScreen, Tui,
    ViewerOptions,
};

use crate::editor::{EditorCommand, EditorError, EditorHost};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the viewer until the user quits
pub async fn run_viewer(
    controller: InteractionController,
    mut host_rx: mpsc::UnboundedReceiver<HostMessage>,
    editor: EditorHost,
    source_name: String,
    options: ViewerOptions,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut state = AppState::new(controller, source_name, options);

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(TICK_RATE);
    let keybindings = KeyBindings::new();

    render(&mut tui, &mut state)?;
    state.render_dirty = false;

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.ui_state.help_visible {
                            keybindings.get_action(KeyContext::Help, &key)
                        } else if state.ui_state.search_active {
                            keybindings.get_filter_input_action(&key)
                        } else {
                            keybindings.get_action(KeyContext::LogViewer, &key)
                        };
                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {
                        let _ = action_tx.send(Action::Tick);
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        let _ = action_tx.send(Action::ShowMessage(format!("Terminal error: {}", e)));
                    }
                }
            }

            Some(action) = action_rx.recv() => {
                if state.apply(action) {
                    state.render_dirty = true;
                }
            }

            // Open requests from the controller; outcomes only reach the
            // status line
            Some(message) = host_rx.recv() => {
                let outcome = match editor.prepare(&message) {
                    Ok(command) => run_editor(&mut tui, &mut events, &command)
                        .await
                        .map(|()| command.target().to_string()),
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(opened) => state.show_message(format!("Opened {}", opened)),
                    Err(e) => {
                        debug!("Open request {:?} failed: {}", message, e);
                        state.show_message(e.to_string());
                    }
                }
                state.render_dirty = true;
            }

            else => break,
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state)?;
            state.render_dirty = false;
        }
    }

    events.shutdown();
    tui.restore()?;
    Ok(())
}

/// Run the editor with the terminal released, then take it back
///
/// Input is not read while the editor runs, so keys typed into a terminal
/// editor never reach the viewer.
async fn run_editor(
    tui: &mut Tui,
    events: &mut EventHandler,
    command: &EditorCommand,
) -> Result<(), EditorError> {
    events.stop().await;
    tui.suspend()?;

    let result = command.run().await;

    let resumed = tui.resume();
    *events = EventHandler::new(TICK_RATE);
    resumed?;
    result
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal().draw(|frame| {
        LogViewerScreen::render(frame, state);
    })?;
    Ok(())
}
