pub mod git;
pub mod sequence_editor;
