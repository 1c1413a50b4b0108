use crate::app::state::SequenceEditState;
use crate::theme::Theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

/// Full-body editor for the interactive rebase todo.
pub struct SequenceEditor<'a, 'b> {
    pub state: &'a mut SequenceEditState<'b>,
    pub theme: &'a Theme,
}

impl Widget for SequenceEditor<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let file_name = self
            .state
            .pending
            .todo_path
            .file_name()
            .map_or_else(|| "todo".into(), |name| name.to_string_lossy());

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(file_name.into_owned(), self.theme.header_active),
                Span::raw(" "),
            ]))
            .title_bottom(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    format!("{} to run", self.state.instruction_count()),
                    self.theme.dimmed,
                ),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);

        let text_area = &mut self.state.text_area;
        text_area.set_cursor_line_style(self.theme.todo_cursor_line);
        text_area.set_block(block);
        Widget::render(&*text_area, area, buf);
    }
}
