use super::handler::menu_start_message;
use crate::app::{
    action::{Action, UpdateResult},
    command::Command,
    state::{AppMode, AppState, HeaderState, RefPromptState, SequenceEditState},
};
use crate::domain::menu::MenuAction;

pub fn update(state: &mut AppState, action: &Action) -> UpdateResult {
    match action {
        Action::SnapshotLoaded(snapshot, menu) => {
            state.header_state = HeaderState::from_snapshot(&state.repo_name, snapshot);
            state.snapshot = Some((**snapshot).clone());
            state.menu = Some(menu.clone());
            UpdateResult::Handled(None)
        }
        Action::SelectMenuKey(key) => {
            if state.is_busy() || state.mode != AppMode::Menu {
                return UpdateResult::Handled(None);
            }
            let Some(item) = state
                .menu
                .as_ref()
                .and_then(|menu| menu.item_for_key(*key))
                .cloned()
            else {
                return UpdateResult::Handled(None);
            };
            match item.action {
                MenuAction::Interactively | MenuAction::EditTodo => {
                    state.interactive_running = true;
                    state.interactive_abort_requested = false;
                    state.mode = AppMode::Loading;
                    state.status_message = Some(menu_start_message(&item.action));
                    state.status_clear_time = None;
                    UpdateResult::Handled(Some(Command::StartInteractive(item.action)))
                }
                other => UpdateResult::Handled(Some(Command::Execute(other))),
            }
        }

        // --- Ref Prompt ---
        Action::RefPromptOpened(prompt) => {
            state.ref_prompt = Some(RefPromptState::new(prompt.clone()));
            state.mode = AppMode::RefInput;
            UpdateResult::Handled(None)
        }
        Action::RefPromptInput(key) => {
            if let Some(prompt) = &mut state.ref_prompt {
                prompt.filter.input(*key);
                prompt.selected = 0;
            }
            UpdateResult::Handled(None)
        }
        Action::RefPromptNext => {
            if let Some(prompt) = &mut state.ref_prompt {
                prompt.select_next();
            }
            UpdateResult::Handled(None)
        }
        Action::RefPromptPrev => {
            if let Some(prompt) = &mut state.ref_prompt {
                prompt.select_prev();
            }
            UpdateResult::Handled(None)
        }
        Action::RefPromptConfirm => {
            let Some(choice) = state.ref_prompt.as_ref().and_then(|prompt| prompt.choice()) else {
                return UpdateResult::Handled(None);
            };
            state.ref_prompt = None;
            state.mode = state.resting_mode();
            UpdateResult::Handled(Some(Command::AnswerRefPrompt(Some(choice))))
        }
        Action::RefPromptCancel => {
            if state.ref_prompt.take().is_none() {
                return UpdateResult::Handled(None);
            }
            state.mode = state.resting_mode();
            UpdateResult::Handled(Some(Command::AnswerRefPrompt(None)))
        }

        // --- Sequence Editor ---
        Action::EditRequestDetected => {
            if state.sequence_edit.is_some() || state.interactive_abort_requested {
                return UpdateResult::Handled(None);
            }
            UpdateResult::Handled(Some(Command::LoadPendingEdit))
        }
        Action::EditSurfaceOpened(pending) => {
            let already_open = state
                .sequence_edit
                .as_ref()
                .is_some_and(|edit| edit.pending.todo_path == pending.todo_path);
            if !already_open && !state.interactive_abort_requested {
                state.sequence_edit = Some(SequenceEditState::new(pending.clone()));
                state.mode = AppMode::SequenceEdit;
            }
            UpdateResult::Handled(None)
        }
        Action::TextAreaInput(key) => {
            if let Some(edit) = &mut state.sequence_edit {
                edit.text_area.input(*key);
            }
            UpdateResult::Handled(None)
        }
        Action::SaveSequence => {
            let Some(edit) = state.sequence_edit.take() else {
                return UpdateResult::Handled(None);
            };
            let contents = edit.text_area.text();
            state.mode = state.resting_mode();
            state.set_status(format!(
                "Handed {} todo line(s) back to git",
                edit.instruction_count()
            ));
            UpdateResult::Handled(Some(Command::CompleteEdit(edit.pending, contents)))
        }
        Action::AbortInteractive => {
            if !state.interactive_running && state.sequence_edit.is_none() {
                return UpdateResult::Handled(None);
            }
            state.interactive_abort_requested = true;
            state.sequence_edit = None;
            state.mode = state.resting_mode();
            UpdateResult::Handled(Some(Command::AbortInteractive))
        }
        Action::InteractiveFinished(result) => {
            let aborted = state.interactive_abort_requested;
            state.interactive_running = false;
            state.interactive_abort_requested = false;
            state.sequence_edit = None;
            match result {
                Ok(msg) => state.set_status(msg.clone()),
                // The abort itself reports through OperationCompleted.
                Err(_) if aborted => state.set_status("Interactive rebase closed"),
                Err(err) => state.set_error(err.clone()),
            }
            if matches!(state.mode, AppMode::Loading | AppMode::SequenceEdit) {
                state.mode = state.resting_mode();
            }
            UpdateResult::Handled(Some(Command::LoadSnapshot))
        }
        _ => UpdateResult::NotHandled,
    }
}
