//! The home page marble: a shaded disc drawn in half-blocks behind the text.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::Widget,
};

use crate::core::choreography::MarblePose;

use super::theme::{fade, shade};

/// Light direction (x right, y down, z toward the viewer), normalised.
const LIGHT: (f64, f64, f64) = (-0.45, -0.55, 0.70);

pub struct Marble {
    pub pose: MarblePose,
    pub tint: Color,
    /// Additional page opacity multiplied into the pose alpha.
    pub alpha: f64,
}

impl Marble {
    /// Centre and radius in pixel space (1 px per column, 2 px per row),
    /// relative to `area`.
    fn geometry(&self, area: Rect) -> (f64, f64, f64) {
        let w = area.width as f64;
        let h = area.height as f64 * 2.0;
        let radius = (w.min(h) * 0.3).max(1.0);
        let start_x = w / 2.0;
        let end_x = w * 0.75;
        let cx = start_x + (end_x - start_x) * self.pose.travel.clamp(0.0, 1.0);
        (cx, h / 2.0, radius)
    }

    /// Colour of the pixel at `(px, py)`, or `None` outside the disc.
    fn pixel(&self, px: f64, py: f64, geometry: (f64, f64, f64), alpha: f64) -> Option<Color> {
        let (cx, cy, r) = geometry;
        let nx = (px + 0.5 - cx) / r;
        let ny = (py + 0.5 - cy) / r;
        let d2 = nx * nx + ny * ny;
        if d2 > 1.0 {
            return None;
        }
        let nz = (1.0 - d2).sqrt();
        let lambert = (nx * LIGHT.0 + ny * LIGHT.1 + nz * LIGHT.2).max(0.0);
        // Specular hot spot.
        let specular = lambert.powi(24) * 0.6;
        let k = 0.25 + 0.75 * lambert + specular;
        Some(fade(shade(self.tint, k), alpha))
    }
}

impl Widget for Marble {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let alpha = (self.pose.alpha * self.alpha).clamp(0.0, 1.0);
        if alpha <= 0.0 || area.width == 0 || area.height == 0 {
            return;
        }
        let geometry = self.geometry(area);
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.pixel(col as f64, row as f64 * 2.0, geometry, alpha);
                let bottom = self.pixel(col as f64, row as f64 * 2.0 + 1.0, geometry, alpha);
                let (ch, fg, bg) = match (top, bottom) {
                    (None, None) => continue,
                    (Some(t), Some(b)) => ('▀', t, b),
                    (Some(t), None) => ('▀', t, Color::Reset),
                    (None, Some(b)) => ('▄', b, Color::Reset),
                };
                if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                    cell.set_char(ch).set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(buf: &Buffer) -> Vec<u16> {
        let area = buf.area;
        (0..area.width)
            .filter(|&x| (0..area.height).any(|y| buf[(x, y)].symbol() != " "))
            .collect()
    }

    #[test]
    fn rests_in_the_centre() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        Marble { pose: MarblePose::REST, tint: Color::Rgb(200, 200, 200), alpha: 1.0 }
            .render(area, &mut buf);
        let cols = painted(&buf);
        let mid = (cols[0] + cols[cols.len() - 1]) / 2;
        assert!((39..=40).contains(&mid));
    }

    #[test]
    fn travels_to_the_right_half() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let pose = MarblePose { travel: 1.0, alpha: 1.0 };
        Marble { pose, tint: Color::Rgb(200, 200, 200), alpha: 1.0 }.render(area, &mut buf);
        let cols = painted(&buf);
        assert!(cols[0] > 40);
    }

    #[test]
    fn invisible_when_faded_out() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        let pose = MarblePose { travel: 0.0, alpha: 0.0 };
        Marble { pose, tint: Color::Rgb(200, 200, 200), alpha: 1.0 }.render(area, &mut buf);
        assert!(painted(&buf).is_empty());
    }
}
