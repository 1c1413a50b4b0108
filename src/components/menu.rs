use crate::domain::menu::Menu;
use crate::theme::Theme;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// The single-key action list for the current rebase state.
pub struct MenuView<'a> {
    pub menu: Option<&'a Menu>,
    pub theme: &'a Theme,
    pub focused: bool,
    pub spinner: &'a str,
}

impl Widget for MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focus
        } else {
            self.theme.border
        };
        let title = self.menu.map_or("Rebase", |menu| menu.title.as_str());
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(title, self.theme.menu_title),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let lines = match self.menu {
            Some(menu) => {
                let mut lines = vec![Line::from("")];
                for item in &menu.items {
                    lines.push(Line::from(vec![
                        Span::raw("  "),
                        Span::styled(item.key.to_string(), self.theme.menu_key),
                        Span::raw("  "),
                        Span::styled(&item.description, self.theme.list_item),
                    ]));
                }
                lines
            }
            None => vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("  {} ", self.spinner), self.theme.menu_key),
                    Span::styled("Reading repository...", self.theme.dimmed),
                ]),
            ],
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
