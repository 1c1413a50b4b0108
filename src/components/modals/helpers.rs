use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
};

/// A `width` x `height` box centred in `area`, shrunk to leave a one-cell
/// margin (room for the shadow) when the terminal is too small.
pub fn modal_area(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [modal] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    modal
}

/// Width for a modal that takes `percent` of the terminal but never less
/// than `min` columns.
pub fn modal_width(percent: u16, min: u16, area: Rect) -> u16 {
    (area.width * percent.min(100) / 100).max(min)
}

pub fn draw_drop_shadow(buf: &mut Buffer, area: Rect, terminal_area: Rect) {
    let shadow = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        ..area
    }
    .intersection(terminal_area);
    buf.set_style(shadow, Style::default().bg(Color::Black));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_area_is_centred() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = modal_area(60, 20, outer);
        assert_eq!(inner, Rect::new(20, 10, 60, 20));
    }

    #[test]
    fn test_modal_area_shrinks_to_fit() {
        let outer = Rect::new(0, 0, 30, 10);
        let inner = modal_area(80, 40, outer);
        assert_eq!((inner.width, inner.height), (28, 8));
        assert_eq!(inner.intersection(outer), inner);
    }

    #[test]
    fn test_shadow_is_clipped_to_terminal() {
        let terminal = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(terminal);
        draw_drop_shadow(&mut buf, Rect::new(5, 2, 10, 10), terminal);
        assert_eq!(buf[(9, 4)].bg, Color::Black);
        assert_ne!(buf[(5, 2)].bg, Color::Black);
    }
}
