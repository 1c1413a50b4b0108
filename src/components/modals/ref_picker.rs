use crate::app::state::RefPromptState;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use super::helpers::{draw_drop_shadow, modal_area, modal_width};

/// Filterable list of refs; free-form text is used when nothing matches.
pub struct RefPicker<'a, 'b> {
    pub theme: &'a Theme,
    pub state: &'a RefPromptState<'b>,
}

impl Widget for RefPicker<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Prompt line, spacer and borders around the candidate list.
        let rows = self.state.candidates.len().clamp(1, 12) + 4;
        let modal_area = modal_area(
            modal_width(60, 30, area),
            u16::try_from(rows).unwrap_or(u16::MAX),
            area,
        );
        if modal_area.width < 4 || modal_area.height < 5 {
            return;
        }

        draw_drop_shadow(buf, modal_area, area);
        Clear.render(modal_area, buf);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.state.prompt.as_str(), self.theme.header_active),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focus);
        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let query = self.state.query();
        let input = Line::from(vec![
            Span::styled("> ", self.theme.menu_key),
            Span::styled(query.as_str(), self.theme.list_item),
            Span::styled("█", self.theme.dimmed),
        ]);
        buf.set_line(chunks[0].x, chunks[0].y, &input, chunks[0].width);

        let matches = self.state.matches();
        if matches.is_empty() {
            let hint = if query.is_empty() {
                "type a ref".to_string()
            } else {
                format!("no match; Enter rebases onto {query}")
            };
            buf.set_line(
                chunks[2].x,
                chunks[2].y,
                &Line::from(Span::styled(hint, self.theme.dimmed)),
                chunks[2].width,
            );
            return;
        }

        let items: Vec<ListItem> = matches
            .iter()
            .map(|name| ListItem::new(Line::from(Span::raw(format!(" {name}")))))
            .collect();
        let list = List::new(items)
            .style(self.theme.list_item)
            .highlight_style(self.theme.list_selected);
        let mut list_state =
            ListState::default().with_selected(Some(self.state.selected.min(matches.len() - 1)));
        StatefulWidget::render(list, chunks[2], buf, &mut list_state);
    }
}
