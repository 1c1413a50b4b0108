use crate::app::{
    action::Action, command::Command, features::rebase::Services, input::map_event_to_action,
    reducer, state::AppState, ui,
};
use crate::domain::menu::ControlCommand;
use crate::infrastructure::sequence_editor::handoff_dir;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use notify::{RecursiveMode, Watcher};
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const HANDOFF_DEBOUNCE: Duration = Duration::from_millis(100);

pub async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: AppState<'_>,
    services: Services,
    action_tx: mpsc::Sender<Action>,
    action_rx: mpsc::Receiver<Action>,
) -> Result<()> {
    // User input channel
    let (event_tx, event_rx) = mpsc::channel(100);
    tokio::task::spawn_blocking(move || loop {
        match event::read() {
            Ok(evt) => {
                if event_tx.blocking_send(Ok(evt)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = event_tx.blocking_send(Err(e));
                break;
            }
        }
    });

    run_loop_with_events(terminal, app_state, services, action_tx, action_rx, event_rx).await
}

pub async fn run_loop_with_events<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app_state: AppState<'_>,
    services: Services,
    action_tx: mpsc::Sender<Action>,
    mut action_rx: mpsc::Receiver<Action>,
    mut event_rx: mpsc::Receiver<Result<Event, std::io::Error>>,
) -> Result<()> {
    let mut interval = interval(TICK_RATE);

    // Sequence editor requests land in the handoff directory
    let handoff = handoff_dir(&services.repo);
    std::fs::create_dir_all(&handoff)
        .with_context(|| format!("Failed to create {}", handoff.display()))?;

    let (notify_tx, mut notify_rx) = mpsc::channel(1);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if res.is_ok() {
            let _ = notify_tx.try_send(());
        }
    })?;
    watcher.watch(&handoff, RecursiveMode::NonRecursive)?;

    let action_tx_clone = action_tx.clone();
    tokio::spawn(async move {
        let mut pending = false;
        loop {
            if pending {
                tokio::select! {
                    Some(()) = notify_rx.recv() => {}
                    () = tokio::time::sleep(HANDOFF_DEBOUNCE) => {
                        let _ = action_tx_clone.send(Action::EditRequestDetected).await;
                        pending = false;
                    }
                }
            } else if notify_rx.recv().await.is_some() {
                pending = true;
            } else {
                break;
            }
        }
    });

    // Initial load; a request may already be waiting from an earlier run
    handle_command(Command::LoadSnapshot, &services, action_tx.clone())?;
    handle_command(Command::LoadPendingEdit, &services, action_tx.clone())?;

    loop {
        // --- 1. Render ---
        terminal.draw(|f| {
            ui::draw(f, &mut app_state);
        })?;

        // --- 2. Event Handling (TEA Runtime) ---
        let action = tokio::select! {
            _ = interval.tick() => Some(Action::Tick),

            // User Input
            Some(res) = event_rx.recv() => {
                let event = res?;
                map_event_to_action(event, &app_state)
            },

            // Async Results
            Some(a) = action_rx.recv() => Some(a),
        };

        // --- 3. Update (Reducer) ---
        if let Some(action) = action {
            let command = reducer::update(&mut app_state, action);

            if app_state.should_quit {
                break;
            }

            if let Some(cmd) = command {
                handle_command(cmd, &services, action_tx.clone())?;
            }
        }
    }

    shutdown(&app_state, &services).await;
    Ok(())
}

/// Leaves nothing waiting on a UI that is about to disappear.
async fn shutdown(app_state: &AppState<'_>, services: &Services) {
    if app_state.ref_prompt.is_some() {
        services.chooser.answer(None);
        return;
    }
    if app_state.interactive_running || app_state.sequence_edit.is_some() {
        info!("Aborting interactive rebase on exit");
        if let Err(e) = services
            .orchestrator
            .control(&services.repo, ControlCommand::Abort)
            .await
        {
            warn!(error = %e, "Failed to abort interactive rebase on exit");
        }
    }
}

pub(crate) fn handle_command(
    command: Command,
    services: &Services,
    tx: mpsc::Sender<Action>,
) -> Result<()> {
    crate::app::features::rebase::handle_command(command, services, tx)
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
