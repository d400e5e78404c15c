//! Project page — a horizontal strip of panels.
//!
//! `[details] [image] [image] … [close]`, scrolled sideways by the gallery's
//! smooth-scroll controller.  [`StripLayout`] positions the panels in strip
//! columns; [`GalleryWidget`] draws each visible panel into its own buffer
//! and blits the part that falls inside the viewport.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::state::{GalleryView, PanelImage};
use crate::core::content::Project;

use super::halfblock;
use super::home::wrap;
use super::spinner::LoadingIndicator;
use super::theme::{fade_style, Theme};

const PAD: u32 = 3;
const DETAILS_MIN: u16 = 30;
const DETAILS_MAX: u16 = 60;
const DETAILS_GAP: u32 = 8;
const IMAGE_GAP: u32 = 4;
const CLOSE_WIDTH: u16 = 8;
/// Images take this share of the page height.
const IMAGE_HEIGHT: f64 = 0.85;
/// Aspect (width / height) assumed until an image has decoded.
const PLACEHOLDER_ASPECT: f64 = 4.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Details,
    Image(usize),
    Close,
}

impl Panel {
    /// Slot in the gallery's visibility latch.  The close panel isn't
    /// latched.
    pub fn latch_index(self) -> Option<usize> {
        match self {
            Panel::Details => Some(0),
            Panel::Image(i) => Some(i + 1),
            Panel::Close => None,
        }
    }
}

/// One panel's box in strip coordinates (x) and page rows (y).  A strip
/// can be far wider than a terminal, so x is a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSpan {
    pub panel: Panel,
    pub x: u32,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PanelSpan {
    pub fn end(&self) -> u32 {
        self.x + u32::from(self.width)
    }

    fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub panels: Vec<PanelSpan>,
    pub content_width: u32,
    pub viewport_width: u16,
    pub height: u16,
}

impl StripLayout {
    /// Lay out the strip for a page of `width` × `height` cells.  `aspects`
    /// holds one entry per image, `None` while unknown.
    pub fn build(width: u16, height: u16, aspects: &[Option<f64>]) -> Self {
        let mut panels = Vec::with_capacity(aspects.len() + 2);
        let mut x = PAD;

        let details_w = (width as f64 * 0.4)
            .round()
            .clamp(DETAILS_MIN as f64, DETAILS_MAX as f64) as u16;
        panels.push(PanelSpan {
            panel: Panel::Details,
            x,
            y: 1.min(height),
            width: details_w,
            height: height.saturating_sub(2),
        });
        x += u32::from(details_w) + DETAILS_GAP;

        let image_h = ((height as f64 * IMAGE_HEIGHT).round() as u16).max(1);
        let image_y = (height - image_h.min(height)) / 2;
        for (i, aspect) in aspects.iter().enumerate() {
            let aspect = aspect.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(PLACEHOLDER_ASPECT);
            let image_w = (image_h as f64 * 2.0 * aspect).round().clamp(4.0, 2000.0) as u16;
            panels.push(PanelSpan {
                panel: Panel::Image(i),
                x,
                y: image_y,
                width: image_w,
                height: image_h,
            });
            x += u32::from(image_w) + IMAGE_GAP;
        }

        panels.push(PanelSpan {
            panel: Panel::Close,
            x,
            y: 0,
            width: CLOSE_WIDTH,
            height,
        });
        x += u32::from(CLOSE_WIDTH) + PAD;

        Self {
            panels,
            content_width: x,
            viewport_width: width,
            height,
        }
    }

    /// Panel under viewport column `col` at scroll `offset`.
    pub fn panel_at(&self, offset: u32, col: u16, row: u16) -> Option<Panel> {
        let strip_x = offset.saturating_add(u32::from(col));
        self.panels
            .iter()
            .find(|p| strip_x >= p.x && strip_x < p.end() && row >= p.y && row < p.bottom())
            .map(|p| p.panel)
    }

    /// Panels overlapping `[offset, offset + viewport)`.
    pub fn visible(&self, offset: u32) -> impl Iterator<Item = &PanelSpan> {
        let end = offset.saturating_add(u32::from(self.viewport_width));
        self.panels
            .iter()
            .filter(move |p| p.end() > offset && p.x < end)
    }
}

/// Draws a project page's strip.
pub struct GalleryWidget<'a> {
    pub project: &'a Project,
    pub gallery: &'a GalleryView,
    pub layout: &'a StripLayout,
    pub offset: u32,
    pub title_shown: bool,
    pub info_shown: bool,
    pub alpha: f64,
    pub tick: u64,
}

impl GalleryWidget<'_> {
    fn render_details(&self, buf: &mut Buffer) {
        let area = buf.area;
        let mut y = area.y;
        let mut put = |buf: &mut Buffer, line: Line<'static>| {
            if y < area.y + area.height {
                buf.set_line(area.x, y, &line, area.width);
            }
            y += 1;
        };
        let styled = |text: String, style: Style| Span::styled(text, fade_style(style, self.alpha));

        if self.title_shown {
            put(buf, Line::from(styled(self.project.title.to_uppercase(), Theme::title_style())));
        } else {
            put(buf, Line::default());
        }
        put(buf, Line::default());
        if !self.info_shown {
            return;
        }

        for line in wrap(&self.project.description, area.width as usize) {
            put(buf, Line::from(styled(line, Theme::body_style())));
        }
        put(buf, Line::default());
        for (label, value) in self.project.details.entries() {
            put(buf, Line::from(styled(label.to_uppercase(), Theme::label_style())));
            for line in wrap(value, area.width as usize) {
                put(buf, Line::from(styled(line, Theme::body_style())));
            }
        }
        put(buf, Line::default());

        let total = self.gallery.images.len();
        let done = self.gallery.images.iter().filter(|i| i.is_settled()).count();
        if y < area.y + area.height {
            LoadingIndicator {
                visible: !self.gallery.images_settled(),
                tick: self.tick,
                done,
                total,
            }
            .render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }

    fn render_image(&self, index: usize, buf: &mut Buffer) {
        let area = buf.area;
        let note = |buf: &mut Buffer, text: &str| {
            let line = Line::from(Span::styled(
                text.to_string(),
                fade_style(Theme::muted_style(), self.alpha),
            ));
            let w = (text.chars().count() as u16).min(area.width);
            buf.set_line(area.x + (area.width - w) / 2, area.y + area.height / 2, &line, w);
        };
        match self.gallery.images.get(index) {
            Some(PanelImage::Ready(img)) => halfblock::render_image(img, area, self.alpha, buf),
            Some(PanelImage::Failed) => note(buf, "image unavailable"),
            _ => note(buf, "·"),
        }
    }

    fn render_close(&self, buf: &mut Buffer) {
        let area = buf.area;
        let mid = area.y + area.height / 2;
        let style = fade_style(Theme::close_style(), self.alpha);
        for (i, text) in ["←", "CLOSE"].into_iter().enumerate() {
            let w = (text.chars().count() as u16).min(area.width);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(area.x + (area.width - w) / 2, mid + i as u16, &line, w);
        }
    }
}

impl Widget for GalleryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.alpha <= 0.0 || area.width == 0 || area.height == 0 {
            return;
        }
        let strip_ready = self.gallery.images_settled();
        for span in self.layout.visible(self.offset) {
            if span.width == 0 || span.height == 0 {
                continue;
            }
            // Until every image has settled only the details panel (with
            // its loading indicator) is shown.
            if !strip_ready && span.panel != Panel::Details {
                continue;
            }
            // Panels stay hidden until they've been scrolled into view.
            let seen = span
                .panel
                .latch_index()
                .is_none_or(|i| self.gallery.seen.is_seen(i));
            if !seen {
                continue;
            }

            let mut panel_buf = Buffer::empty(Rect::new(0, 0, span.width, span.height));
            match span.panel {
                Panel::Details => self.render_details(&mut panel_buf),
                Panel::Image(i) => self.render_image(i, &mut panel_buf),
                Panel::Close => self.render_close(&mut panel_buf),
            }
            blit(&panel_buf, span, self.offset, area, buf);
        }
    }
}

/// Copy a panel buffer into the page, clipped to the viewport.
fn blit(src: &Buffer, span: &PanelSpan, offset: u32, area: Rect, dst: &mut Buffer) {
    for px in 0..span.width {
        let strip_x = i64::from(span.x) + i64::from(px) - i64::from(offset);
        if strip_x < 0 || strip_x >= i64::from(area.width) {
            continue;
        }
        for py in 0..span.height.min(area.height.saturating_sub(span.y)) {
            let (Some(from), Some(to)) = (
                src.cell(Position::new(px, py)),
                dst.cell_mut(Position::new(area.x + strip_x as u16, area.y + span.y + py)),
            ) else {
                continue;
            };
            *to = from.clone();
        }
    }
}
