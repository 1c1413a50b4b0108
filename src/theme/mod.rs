use ratatui::style::{Color, Modifier, Style};

pub mod nord;
pub mod palette;

pub use palette::Palette;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub border: Style,
    pub border_focus: Style,

    pub status_ready: Style,
    pub status_info: Style,
    pub status_warn: Style,
    pub status_error: Style,

    pub header_logo: Style,
    pub header_repo: Style,
    pub header_branch: Style,
    pub header_idle: Style,
    pub header_rebasing: Style,
    pub header_item: Style,
    pub header_active: Style,
    pub header: Style,

    pub footer_segment_key: Style,
    pub footer_segment_val: Style,
    pub footer: Style,

    pub menu_title: Style,
    pub menu_key: Style,
    pub todo_cursor_line: Style,

    pub list_selected: Style,
    pub list_item: Style,
    pub dimmed: Style,
}

/// Bold text on a solid background, used for header and status badges.
fn badge(bg: Color, fg: Color) -> Style {
    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
}

impl Theme {
    #[must_use]
    pub fn from_palette(p: &Palette) -> Self {
        Self {
            border: Style::default().fg(p.surface2),
            border_focus: Style::default().fg(p.blue),

            status_ready: badge(p.green, p.crust),
            status_info: badge(p.blue, p.crust),
            status_warn: badge(p.yellow, p.crust),
            status_error: badge(p.red, p.crust),

            header_logo: badge(p.blue, p.crust),
            header_repo: badge(p.surface1, p.text),
            header_branch: badge(p.mauve, p.crust),
            header_idle: Style::default().bg(p.surface0).fg(p.subtext0),
            header_rebasing: badge(p.yellow, p.crust),
            header_item: Style::default().bg(p.surface0).fg(p.text),
            header_active: badge(p.green, p.crust),
            header: Style::default().bg(p.base).fg(p.text),

            footer_segment_key: badge(p.surface0, p.blue),
            footer_segment_val: Style::default().bg(p.base).fg(p.text),
            footer: Style::default().bg(p.crust).fg(p.subtext0),

            menu_title: Style::default().fg(p.mauve).add_modifier(Modifier::BOLD),
            menu_key: Style::default().fg(p.teal).add_modifier(Modifier::BOLD),
            todo_cursor_line: Style::default().bg(p.surface1),

            list_selected: badge(p.blue, p.crust),
            list_item: Style::default().fg(p.text),
            dimmed: Style::default().fg(p.overlay0).add_modifier(Modifier::DIM),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_palette(&nord::NORD)
    }
}
