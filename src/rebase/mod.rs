//! Rebase orchestration: which actions are valid right now, and how they run.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{Outcome, RebaseOrchestrator, RebaseSettings, RefTarget};
pub use session::InteractiveRebaseSession;
