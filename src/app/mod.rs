pub mod action;
pub mod chooser;
pub mod command;
pub mod config;
pub mod features;
pub mod input;
pub mod r#loop;
pub mod recovery;
pub mod reducer;
pub mod state;
pub mod ui;
