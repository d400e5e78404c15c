//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with the page and a bottom status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            page_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// The fixed close button in the project page's top-right corner.
    pub fn close_button(&self) -> Rect {
        let w = CLOSE_LABEL.chars().count() as u16;
        let page = self.page_area;
        Rect::new(
            page.x + page.width.saturating_sub(w + 2),
            page.y + 1.min(page.height.saturating_sub(1)),
            w.min(page.width),
            1.min(page.height),
        )
    }
}

pub const CLOSE_LABEL: &str = "[ CLOSE ]";

pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_last_row() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.page_area.height, 23);
        assert_eq!(layout.status_area, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn close_button_hugs_the_right_edge() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        let close = layout.close_button();
        assert_eq!(close.x + close.width, 78);
        assert_eq!(close.y, 1);
        assert!(point_in_rect(close, close.x, 1));
        assert!(!point_in_rect(close, close.x + close.width, 1));
    }
}
