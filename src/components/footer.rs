use crate::app::state::{AppMode, AppState};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct FooterItem {
    pub key: &'static str,
    pub desc: &'static str,
}

const fn item(key: &'static str, desc: &'static str) -> FooterItem {
    FooterItem { key, desc }
}

pub struct Footer<'a, 'b> {
    pub state: &'a AppState<'b>,
    pub theme: &'a Theme,
    pub spinner: &'a str,
}

impl Footer<'_, '_> {
    fn items(&self) -> Vec<FooterItem> {
        if self.state.last_error.is_some() {
            return vec![item("Esc", "dismiss")];
        }

        match self.state.mode {
            AppMode::Menu => vec![item("key", "run"), item("g", "refresh"), item("q", "quit")],
            AppMode::RefInput => vec![
                item("ENTER", "rebase"),
                item("↑/↓", "pick"),
                item("Esc", "cancel"),
            ],
            AppMode::SequenceEdit => vec![item("ctrl+s", "save"), item("ctrl+q", "abort")],
            AppMode::Loading if self.state.interactive_running => vec![item("Esc", "abort")],
            AppMode::Loading => vec![],
        }
    }
}

impl Widget for Footer<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let state = self.state;

        // Status segment
        let status_span = if let Some(err) = &state.last_error {
            // The modal has the full text; one line fits here
            let first = err.message.lines().next().unwrap_or_default();
            Span::styled(format!("  ERROR: {first}  "), theme.status_error)
        } else if let Some(msg) = &state.status_message {
            Span::styled(format!("  {msg}  "), theme.status_info)
        } else if state.snapshot.is_none() {
            Span::styled(format!("  {} LOADING  ", self.spinner), theme.status_warn)
        } else {
            Span::styled("  READY  ", theme.status_ready)
        };

        let mut spans = vec![status_span, Span::raw(" ")];

        // Background tasks
        if state.active_tasks.len() > 1 {
            spans.push(Span::styled(
                format!(" {} {} tasks ", self.spinner, state.active_tasks.len()),
                theme.status_info,
            ));
            spans.push(Span::raw("  "));
        }

        let available_width = area.width.saturating_sub(4) as usize;
        let mut current_width = spans.iter().map(Span::width).sum::<usize>();

        for item in self.items() {
            let key_str = format!(" {} ", item.key);
            let desc_str = format!(" {} ", item.desc);
            let item_width = key_str.len() + desc_str.len();
            if current_width + item_width + 1 > available_width {
                break;
            }
            spans.push(Span::styled(key_str, theme.footer_segment_key));
            spans.push(Span::styled(desc_str, theme.footer_segment_val));
            spans.push(Span::raw(" "));
            current_width += item_width + 1;
        }

        Paragraph::new(Line::from(spans))
            .style(theme.footer)
            .render(area, buf);
    }
}
