//! Loading indicator — a small spinner + label.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// "loading images" indicator, drawn at the top-left of `area`.
pub struct LoadingIndicator {
    pub visible: bool,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
    /// Images decoded so far / total.
    pub done: usize,
    pub total: usize,
}

impl LoadingIndicator {
    fn frame(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()]
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 8 || area.height == 0 {
            return;
        }
        let label = format!("{} loading {}/{}", self.frame(), self.done, self.total);
        let width = (label.chars().count() as u16).min(area.width);
        let line = Line::from(Span::styled(label, Theme::spinner_style()));
        buf.set_line(area.x, area.y, &line, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_advances_with_tick() {
        let a = LoadingIndicator { visible: true, tick: 0, done: 0, total: 1 };
        let b = LoadingIndicator { visible: true, tick: 1, done: 0, total: 1 };
        assert_ne!(a.frame(), b.frame());
    }

    #[test]
    fn hidden_renders_nothing() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        LoadingIndicator { visible: false, tick: 0, done: 0, total: 3 }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
