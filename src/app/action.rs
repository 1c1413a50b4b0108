use crate::app::state::RefPrompt;
use crate::domain::menu::Menu;
use crate::domain::models::RepoSnapshot;
use crate::app::command::Command;
use crate::infrastructure::sequence_editor::PendingEdit;

#[derive(Debug, Clone)]
pub enum UpdateResult {
    Handled(Option<Command>),
    NotHandled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // --- System / Terminal ---
    Tick,
    Quit,
    Refresh,      // Re-probe the repository (g)
    DismissError, // Close the error modal

    // --- Menu ---
    SelectMenuKey(char), // A key from the current rebase menu

    // --- Ref Prompt ---
    RefPromptOpened(RefPrompt),                  // The chooser wants a target ref
    RefPromptInput(crossterm::event::KeyEvent),  // Typing into the filter
    RefPromptNext,                               // Next candidate
    RefPromptPrev,                               // Previous candidate
    RefPromptConfirm,                            // Enter
    RefPromptCancel,                             // Esc

    // --- Sequence Editor ---
    EditRequestDetected,                       // The handoff directory changed
    EditSurfaceOpened(PendingEdit),            // git is waiting on this todo
    TextAreaInput(crossterm::event::KeyEvent), // Editing the todo
    SaveSequence,                              // Hand the todo back to git
    AbortInteractive,                          // Close the editor and abort the rebase

    // --- Async Results (The "Callback") ---
    SnapshotLoaded(Box<RepoSnapshot>, Menu),     // Fresh probe result
    OperationStarted(String),                    // "Rebasing onto origin/main..."
    OperationCompleted(Result<String, String>),  // Success/Failure message
    InteractiveFinished(Result<String, String>), // The interactive git process exited
    ErrorOccurred(String),                       // General error reporting
}
