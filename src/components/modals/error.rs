use crate::app::state::{ErrorSeverity, ErrorState};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};

use super::helpers::{draw_drop_shadow, modal_area, modal_width};

/// Shows git's diagnostic verbatim with any recovery hints under it.
pub struct ErrorModal<'a> {
    pub theme: &'a Theme,
    pub error: &'a ErrorState,
}

impl ErrorModal<'_> {
    fn title(&self) -> (&'static str, Style) {
        match self.error.severity {
            ErrorSeverity::Info => (" NOTE ", self.theme.header_item),
            ErrorSeverity::Warning => (" WARNING ", self.theme.status_warn),
            ErrorSeverity::Error | ErrorSeverity::Critical => (" GIT FAILED ", self.theme.status_error),
        }
    }

    fn body(&self) -> Vec<Line<'_>> {
        let mut lines: Vec<Line> = self
            .error
            .message
            .lines()
            .map(|line| Line::styled(line, self.theme.list_item))
            .collect();

        if !self.error.suggestions.is_empty() {
            lines.push(Line::default());
            lines.push(Line::styled("Try:", self.theme.menu_title));
            lines.extend(self.error.suggestions.iter().map(|hint| {
                Line::from(vec![
                    Span::styled("  - ", self.theme.menu_key),
                    Span::styled(hint.as_str(), self.theme.list_item),
                ])
            }));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(
                self.error.timestamp.format("%H:%M:%S").to_string(),
                self.theme.dimmed,
            ),
            Span::styled("  Esc", self.theme.footer_segment_key),
            Span::styled(" dismiss", self.theme.dimmed),
        ]));
        lines
    }
}

impl Widget for ErrorModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, title_style) = self.title();
        let body = self.body();

        let width = modal_width(70, 40, area);
        // Borders and padding take four columns; wrapped lines need more rows.
        let text_width = usize::from(width.saturating_sub(4)).max(1);
        let rows: usize = body
            .iter()
            .map(|line| line.width().max(1).div_ceil(text_width))
            .sum();
        let height = u16::try_from(rows + 2).unwrap_or(u16::MAX);

        let modal = modal_area(width, height, area);
        if modal.width < 4 || modal.height < 3 {
            return;
        }

        draw_drop_shadow(buf, modal, area);
        Clear.render(modal, buf);

        let block = Block::default()
            .title(Span::styled(title, title_style))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(title_style)
            .padding(Padding::horizontal(1));

        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(modal, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(error: &ErrorState) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        ErrorModal {
            theme: &Theme::default(),
            error,
        }
        .render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_conflict_shows_message_and_hints() {
        let error = ErrorState::new(
            "Failed to merge in the changes.\nCONFLICT (content): Merge conflict in src/lib.rs",
            ErrorSeverity::Error,
        );
        let screen = render(&error);
        assert!(screen.contains("GIT FAILED"));
        assert!(screen.contains("Merge conflict in src/lib.rs"));
        assert!(screen.contains("Try:"));
    }

    #[test]
    fn test_no_hints_for_unknown_errors() {
        let error = ErrorState::new("something odd", ErrorSeverity::Warning);
        let screen = render(&error);
        assert!(screen.contains("WARNING"));
        assert!(!screen.contains("Try:"));
    }
}
