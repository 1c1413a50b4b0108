use crate::app::{
    action::Action,
    state::{AppMode, AppState},
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn map_event_to_action(event: Event, app_state: &AppState<'_>) -> Option<Action> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // The error modal swallows input until dismissed.
    if app_state.last_error.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::DismissError),
            _ => None,
        };
    }

    match app_state.mode {
        AppMode::SequenceEdit => map_sequence_edit(key),
        AppMode::RefInput => match key.code {
            KeyCode::Esc => Some(Action::RefPromptCancel),
            KeyCode::Enter => Some(Action::RefPromptConfirm),
            KeyCode::Down | KeyCode::Tab => Some(Action::RefPromptNext),
            KeyCode::Up | KeyCode::BackTab => Some(Action::RefPromptPrev),
            _ => Some(Action::RefPromptInput(key)),
        },
        AppMode::Loading => match key.code {
            KeyCode::Esc if app_state.interactive_running => Some(Action::AbortInteractive),
            _ => None,
        },
        AppMode::Menu => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('g') => Some(Action::Refresh),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::SelectMenuKey(c))
            }
            _ => None,
        },
    }
}

fn map_sequence_edit(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => return Some(Action::SaveSequence),
            KeyCode::Char('q') => return Some(Action::AbortInteractive),
            _ => {}
        }
    }
    Some(Action::TextAreaInput(key))
}
