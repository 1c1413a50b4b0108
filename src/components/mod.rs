pub mod footer;
pub mod header;
pub mod menu;
pub mod modals;
pub mod sequence_editor;
