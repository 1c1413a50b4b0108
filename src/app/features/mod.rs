pub mod rebase;
pub mod ui;
