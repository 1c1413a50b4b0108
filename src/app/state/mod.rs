use crate::domain::menu::Menu;
use crate::domain::models::RepoSnapshot;
use std::time::{Duration, Instant};

pub mod error;
pub mod header;
pub mod input;
pub mod ref_prompt;
pub mod sequence_edit;

// Re-exports
pub use error::{ErrorSeverity, ErrorState};
pub use header::HeaderState;
pub use input::AppTextArea;
pub use ref_prompt::{RefPrompt, RefPromptState};
pub use sequence_edit::SequenceEditState;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AppMode {
    Menu,         // Choosing the next rebase action
    RefInput,     // Picking a target ref
    SequenceEdit, // Editing the interactive rebase todo
    Loading,      // A git command is running
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState<'a> {
    // --- Connectivity & Status ---
    pub should_quit: bool,
    pub mode: AppMode,
    pub last_error: Option<ErrorState>,
    pub status_message: Option<String>, // "Rebase finished"
    pub status_clear_time: Option<Instant>,
    pub active_tasks: Vec<String>,

    // --- Repository ---
    pub repo_name: String,
    pub snapshot: Option<RepoSnapshot>,
    pub menu: Option<Menu>,
    pub header_state: HeaderState,

    // --- Interactive rebase ---
    pub interactive_running: bool,
    pub interactive_abort_requested: bool,

    // --- Modals ---
    pub ref_prompt: Option<RefPromptState<'a>>,
    pub sequence_edit: Option<SequenceEditState<'a>>,

    // --- Animation ---
    pub frame_count: u64,
}

impl AppState<'_> {
    pub fn new(repo_name: impl Into<String>) -> Self {
        Self {
            repo_name: repo_name.into(),
            ..Self::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.active_tasks.is_empty() || self.interactive_running
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_clear_time = Some(Instant::now() + STATUS_TTL);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(ErrorState::new(message, ErrorSeverity::Error));
    }

    /// The mode to fall back to once a modal closes.
    pub fn resting_mode(&self) -> AppMode {
        if self.is_busy() {
            AppMode::Loading
        } else {
            AppMode::Menu
        }
    }
}

impl Default for AppState<'_> {
    fn default() -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Menu,
            last_error: None,
            status_message: None,
            status_clear_time: None,
            active_tasks: Vec::new(),
            repo_name: String::new(),
            snapshot: None,
            menu: None,
            header_state: HeaderState::default(),
            interactive_running: false,
            interactive_abort_requested: false,
            ref_prompt: None,
            sequence_edit: None,
            frame_count: 0,
        }
    }
}
