use crate::app::state::{AppMode, AppState};
use crate::components::footer::Footer;
use crate::components::header::Header;
use crate::components::menu::MenuView;
use crate::components::modals::{ErrorModal, RefPicker};
use crate::components::sequence_editor::SequenceEditor;
use crate::theme::Theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MENU_WIDTH: u16 = 48;

pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub fn get_layout(area: Rect) -> AppLayout {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);

    AppLayout {
        header: main[0],
        body: main[1],
        footer: main[2],
    }
}

fn menu_area(body: Rect, items: usize) -> Rect {
    let width = MENU_WIDTH.min(body.width);
    let height = (items as u16 + 4).min(body.height);
    Rect {
        x: body.x + 1u16.min(body.width.saturating_sub(width)),
        y: body.y,
        width,
        height,
    }
}

pub fn spinner(frame_count: u64) -> &'static str {
    SPINNER[(frame_count % SPINNER.len() as u64) as usize]
}

pub fn draw(f: &mut Frame, app_state: &mut AppState) {
    if f.area().width == 0 || f.area().height == 0 {
        return;
    }

    let theme = Theme::default();
    let layout = get_layout(f.area());
    let spinner = spinner(app_state.frame_count);

    // --- Header ---
    let rebasing = app_state
        .snapshot
        .as_ref()
        .is_some_and(|snapshot| snapshot.status.is_in_progress());
    f.render_widget(
        Header {
            state: &app_state.header_state,
            theme: &theme,
            rebasing,
        },
        layout.header,
    );

    // --- Body ---
    let editing = app_state.mode == AppMode::SequenceEdit;
    match app_state.sequence_edit.as_mut() {
        Some(edit) if editing => {
            f.render_widget(
                SequenceEditor {
                    state: edit,
                    theme: &theme,
                },
                layout.body,
            );
        }
        _ => {
            let items = app_state.menu.as_ref().map_or(1, |menu| menu.items.len());
            f.render_widget(
                MenuView {
                    menu: app_state.menu.as_ref(),
                    theme: &theme,
                    focused: app_state.mode == AppMode::Menu,
                    spinner,
                },
                menu_area(layout.body, items),
            );
        }
    }

    // --- Footer ---
    f.render_widget(
        Footer {
            state: app_state,
            theme: &theme,
            spinner,
        },
        layout.footer,
    );

    // --- Modals ---
    if let Some(prompt) = &app_state.ref_prompt {
        f.render_widget(
            RefPicker {
                theme: &theme,
                state: prompt,
            },
            f.area(),
        );
    }
    if let Some(error) = &app_state.last_error {
        f.render_widget(
            ErrorModal {
                theme: &theme,
                error,
            },
            f.area(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::{build_menu, MenuOptions};
    use crate::domain::models::{HeadRef, RebaseStatus, RepoSnapshot};
    use crate::infrastructure::sequence_editor::PendingEdit;
    use crate::app::state::{HeaderState, SequenceEditState};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_control_menu() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let snapshot = RepoSnapshot {
            status: RebaseStatus::InProgress {
                original_head: "topic".to_string(),
            },
            head: HeadRef::default(),
        };
        let mut state = AppState::new("app");
        state.header_state = HeaderState::from_snapshot("app", &snapshot);
        state.menu = Some(build_menu(
            &snapshot.status,
            &snapshot.head,
            MenuOptions::default(),
        ));
        state.snapshot = Some(snapshot);

        terminal.draw(|f| draw(f, &mut state)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("GREBASE"));
        assert!(text.contains("rebasing topic"));
        assert!(text.contains("r  Continue"));
        assert!(text.contains("a  Abort"));
    }

    #[test]
    fn test_draw_sequence_editor() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut state = AppState::new("app");
        state.mode = AppMode::SequenceEdit;
        state.sequence_edit = Some(SequenceEditState::new(PendingEdit {
            todo_path: "/work/app/.git/rebase-merge/git-rebase-todo".into(),
            contents: "pick a1b2c3 first\n# comment\n".to_string(),
        }));

        terminal.draw(|f| draw(f, &mut state)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("git-rebase-todo"));
        assert!(text.contains("pick a1b2c3 first"));
        assert!(text.contains("1 to run"));
        assert!(text.contains("ctrl+s"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(3, 2)).unwrap();
        let mut state = AppState::new("app");
        state.set_error("boom");
        terminal.draw(|f| draw(f, &mut state)).unwrap();
    }
}
