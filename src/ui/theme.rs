//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Per-work accent colours, cycled by list position.
const ACCENTS: [Color; 7] = [
    Color::Rgb(0xff, 0x6b, 0x6b),
    Color::Rgb(0xf0, 0xe6, 0x8c),
    Color::Rgb(0x87, 0xce, 0xeb),
    Color::Rgb(0x98, 0xfb, 0x98),
    Color::Rgb(0xdd, 0xa0, 0xdd),
    Color::Rgb(0xff, 0xa5, 0x00),
    Color::Rgb(0xff, 0xc0, 0xcb),
];

const INK: Color = Color::Rgb(0xee, 0xee, 0xee);
const MUTED: Color = Color::Rgb(0x88, 0x88, 0x88);

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub fn accent(index: usize) -> Color {
        ACCENTS[index % ACCENTS.len()]
    }

    /// Marble tint when no work is highlighted.
    pub fn marble_base() -> Color {
        Color::Rgb(0xcc, 0xcc, 0xd4)
    }

    // ── home ───────────────────────────────────────────────────
    pub fn name_style() -> Style {
        Style::default().fg(INK).add_modifier(Modifier::BOLD)
    }

    pub fn tagline_style() -> Style {
        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
    }

    pub fn section_style() -> Style {
        Style::default().fg(MUTED).add_modifier(Modifier::BOLD)
    }

    pub fn body_style() -> Style {
        Style::default().fg(INK)
    }

    pub fn muted_style() -> Style {
        Style::default().fg(MUTED)
    }

    pub fn link_style() -> Style {
        Style::default().fg(INK).add_modifier(Modifier::UNDERLINED)
    }

    pub fn selected_style() -> Style {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    // ── gallery ────────────────────────────────────────────────
    pub fn title_style() -> Style {
        Style::default().fg(INK).add_modifier(Modifier::BOLD)
    }

    pub fn label_style() -> Style {
        Style::default().fg(MUTED)
    }

    pub fn close_style() -> Style {
        Style::default().fg(INK).add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn spinner_style() -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }
}

/// Fade `color` toward black by `alpha` (1 = unchanged, 0 = black).
/// Palette colours have no channels to scale, so they flip to dark gray
/// halfway through.
pub fn fade(color: Color, alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let s = |c: u8| (c as f64 * a).round() as u8;
            Color::Rgb(s(r), s(g), s(b))
        }
        other if a >= 0.5 => other,
        _ => Color::DarkGray,
    }
}

/// Apply [`fade`] to a style's foreground.
pub fn fade_style(style: Style, alpha: f64) -> Style {
    match style.fg {
        Some(fg) => style.fg(fade(fg, alpha)),
        None => style.fg(fade(INK, alpha)),
    }
}

/// Scale an RGB colour's brightness by `k` (values above 1 brighten).
pub fn shade(color: Color, k: f64) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let s = |c: u8| (c as f64 * k).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(s(r), s(g), s(b))
        }
        other => other,
    }
}
