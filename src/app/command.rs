use crate::domain::menu::MenuAction;
use crate::infrastructure::sequence_editor::PendingEdit;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadSnapshot,
    Execute(MenuAction),
    /// Actions that hold git open behind the sequence editor.
    StartInteractive(MenuAction),
    AnswerRefPrompt(Option<String>),
    LoadPendingEdit,
    CompleteEdit(PendingEdit, String),
    AbortInteractive,
}
