use super::input::AppTextArea;
use crate::infrastructure::sequence_editor::PendingEdit;

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceEditState<'a> {
    pub pending: PendingEdit,
    pub text_area: AppTextArea<'a>,
}

impl SequenceEditState<'_> {
    pub fn new(pending: PendingEdit) -> Self {
        let text_area = AppTextArea::from_text(&pending.contents);
        Self { pending, text_area }
    }

    /// Number of todo lines that will actually run.
    pub fn instruction_count(&self) -> usize {
        self.text_area
            .lines()
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .count()
    }
}
