use crate::app::state::HeaderState;
use crate::theme::Theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Header<'a> {
    pub state: &'a HeaderState,
    pub theme: &'a Theme,
    pub rebasing: bool,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status_style = if self.rebasing {
            self.theme.header_rebasing
        } else {
            self.theme.header_idle
        };

        let spans = vec![
            Span::styled(" GREBASE ", self.theme.header_logo),
            Span::styled(&self.state.repo_text, self.theme.header_repo),
            Span::styled(&self.state.branch_text, self.theme.header_branch),
            Span::styled(&self.state.status_text, status_style),
        ];

        Paragraph::new(Line::from(spans))
            .style(self.theme.header)
            .render(area, buf);
    }
}
