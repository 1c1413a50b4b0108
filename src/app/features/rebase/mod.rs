pub mod actions;
pub mod handler;

pub use actions::update;
pub use handler::{handle_command, Services};
