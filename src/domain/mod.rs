pub mod error;
pub mod menu;
pub mod models;
pub mod vcs;
