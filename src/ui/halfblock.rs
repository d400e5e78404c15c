//! Image rendering with Unicode `▀` half-blocks (2 pixels per cell).

use image::imageops::FilterType;
use ratatui::{buffer::Buffer, layout::Position, layout::Rect, style::Color};

use super::theme::fade;

/// Render a pre-resized `RgbaImage` fitted inside `area`.
///
/// Aspect ratio is preserved and the image is centred horizontally.
/// Terminal cells are ~2× taller than wide, so each cell represents 1 pixel
/// wide × 2 pixels tall.  `alpha` fades every pixel toward black.
pub fn render_image(thumb: &image::RgbaImage, area: Rect, alpha: f64, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 || thumb.width() == 0 || thumb.height() == 0 {
        return;
    }

    let max_px_w = area.width as f64;
    let max_px_h = (area.height as f64) * 2.0;

    let src_w = thumb.width() as f64;
    let src_h = thumb.height() as f64;

    // Panels are sized from the image's aspect, so upscaling small sources
    // is allowed here.
    let scale = (max_px_w / src_w).min(max_px_h / src_h);
    let fit_w = (src_w * scale).round().max(1.0) as u32;
    let fit_h = (src_h * scale).round().max(1.0) as u32;

    let rgba = image::imageops::resize(thumb, fit_w, fit_h, FilterType::Triangle);
    let (iw, ih) = (rgba.width(), rgba.height());

    let col_offset = (area.width.saturating_sub(iw as u16)) / 2;

    for row in 0..area.height {
        let yt = (row as u32) * 2;
        let yb = yt + 1;
        if yt >= ih {
            break;
        }
        for col in 0..iw.min(area.width as u32) {
            let t = rgba.get_pixel(col, yt);
            let fg = fade(Color::Rgb(t[0], t[1], t[2]), alpha);
            let bg = if yb < ih {
                let b = rgba.get_pixel(col, yb);
                fade(Color::Rgb(b[0], b[1], b[2]), alpha)
            } else {
                Color::Reset
            };
            if let Some(cell) =
                buf.cell_mut(Position::new(area.x + col_offset + col as u16, area.y + row))
            {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}
