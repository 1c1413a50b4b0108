use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    state::{AppMode, AppState},
};
use std::time::Instant;

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::Tick => {
            state.frame_count = state.frame_count.wrapping_add(1);
            if state
                .status_clear_time
                .is_some_and(|deadline| Instant::now() >= deadline)
            {
                state.status_message = None;
                state.status_clear_time = None;
            }
            UpdateResult::Handled(None)
        }
        Action::Quit => {
            state.should_quit = true;
            UpdateResult::Handled(None)
        }
        Action::Refresh => {
            if state.is_busy() {
                state.set_status("Busy; refresh after the current command");
                UpdateResult::Handled(None)
            } else {
                UpdateResult::Handled(Some(Command::LoadSnapshot))
            }
        }
        Action::DismissError => {
            state.last_error = None;
            UpdateResult::Handled(None)
        }
        Action::OperationStarted(msg) => {
            state.active_tasks.push(msg.clone());
            state.status_message = Some(msg.clone());
            state.status_clear_time = None;
            if state.mode == AppMode::Menu {
                state.mode = AppMode::Loading;
            }
            UpdateResult::Handled(None)
        }
        Action::OperationCompleted(result) => {
            if !state.active_tasks.is_empty() {
                state.active_tasks.remove(0);
            }
            match result {
                Ok(msg) => state.set_status(msg.clone()),
                Err(err) => {
                    state.status_message = None;
                    state.set_error(err.clone());
                }
            }
            if state.mode == AppMode::Loading {
                state.mode = state.resting_mode();
            }
            // The outcome may have moved the repository between menus.
            UpdateResult::Handled(Some(Command::LoadSnapshot))
        }
        Action::ErrorOccurred(err) => {
            state.set_error(err.clone());
            if state.mode == AppMode::Loading {
                state.mode = state.resting_mode();
            }
            UpdateResult::Handled(None)
        }
        _ => UpdateResult::NotHandled,
    }
}
