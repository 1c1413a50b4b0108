//! Magit-style rebase menus for plain git.
//!
//! [`rebase::RebaseOrchestrator`] decides which rebase actions apply to a
//! repository and runs them through git; the `app` module puts a terminal
//! UI in front of it, including an in-process editor for interactive todos.

pub mod app;
pub mod components;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod rebase;
pub mod theme;
