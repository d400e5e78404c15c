//! Home page — hero, selected works, about, socials.
//!
//! The page is laid out once per size into a [`HomeDocument`] (a list of
//! typed rows plus the section positions the marble choreography needs) and
//! drawn at the smooth-scroll offset by [`HomeWidget`].  Styles are resolved
//! at draw time so hover and selection don't force a relayout.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::state::HomeItem;
use crate::core::choreography::SectionMarks;
use crate::core::content::Portfolio;

use super::theme::{fade_style, Theme};

/// Horizontal padding of the text column.
const MARGIN: u16 = 4;
/// Text column never grows past this.
const MAX_COLUMN: u16 = 72;
/// Below this page width the marble stays centred.
const TRAVEL_MIN_WIDTH: u16 = 80;

#[derive(Debug, Clone, PartialEq)]
enum Row {
    Blank,
    Name,
    Tagline,
    Heading(&'static str),
    Work(usize),
    Text(String),
    Email,
    Social(usize),
}

/// Laid-out home page for one terminal size.
#[derive(Debug, Clone)]
pub struct HomeDocument {
    rows: Vec<Row>,
    marks: SectionMarks,
    width: u16,
    viewport: u16,
    column: u16,
}

impl HomeDocument {
    pub fn build(portfolio: &Portfolio, width: u16, viewport: u16) -> Self {
        let column = column_width(width);
        let mut rows = Vec::new();

        // Hero: name and tagline sit in the middle of at least half a screen.
        let hero = (viewport / 2).max(6) as usize;
        let lead = hero.saturating_sub(2) / 2;
        rows.extend(std::iter::repeat_n(Row::Blank, lead));
        rows.push(Row::Name);
        rows.push(Row::Tagline);
        while rows.len() < hero {
            rows.push(Row::Blank);
        }

        // Works: pinned for at least one and a half screens.
        let works_top = rows.len();
        rows.push(Row::Heading("SELECTED WORKS"));
        rows.push(Row::Blank);
        for (i, new_group) in portfolio.group_breaks().into_iter().enumerate() {
            if new_group {
                rows.push(Row::Blank);
            }
            rows.push(Row::Work(i));
        }
        let works_min = works_top + (viewport as usize * 3).div_ceil(2);
        while rows.len() < works_min {
            rows.push(Row::Blank);
        }
        let works_bottom = rows.len();

        let about_top = rows.len();
        rows.push(Row::Heading("ABOUT"));
        rows.push(Row::Blank);
        for paragraph in &portfolio.profile.about {
            for line in wrap(paragraph, column as usize) {
                rows.push(Row::Text(line));
            }
            rows.push(Row::Blank);
        }
        if portfolio.profile.email.is_some() {
            rows.push(Row::Email);
            rows.push(Row::Blank);
        }

        if !portfolio.socials.is_empty() {
            rows.push(Row::Heading("ELSEWHERE"));
            rows.push(Row::Blank);
            rows.extend((0..portfolio.socials.len()).map(Row::Social));
        }
        rows.extend(std::iter::repeat_n(Row::Blank, (viewport / 3) as usize));

        Self {
            rows,
            marks: SectionMarks {
                works_top: works_top as f64,
                works_bottom: works_bottom as f64,
                about_top: about_top as f64,
            },
            width,
            viewport,
            column,
        }
    }

    /// Built for this size already.
    pub fn fits(&self, width: u16, viewport: u16) -> bool {
        self.width == width && self.viewport == viewport
    }

    pub fn height(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    pub fn marks(&self) -> SectionMarks {
        self.marks
    }

    /// Whether the marble may leave the centre at this width.
    pub fn travel_enabled(&self) -> bool {
        self.width >= TRAVEL_MIN_WIDTH
    }

    pub fn item_at(&self, row: usize) -> Option<HomeItem> {
        match self.rows.get(row)? {
            Row::Work(i) => Some(HomeItem::Work(*i)),
            Row::Social(i) => Some(HomeItem::Social(*i)),
            _ => None,
        }
    }

    pub fn row_of(&self, item: HomeItem) -> Option<usize> {
        self.rows.iter().position(|r| match (r, item) {
            (Row::Work(a), HomeItem::Work(b)) | (Row::Social(a), HomeItem::Social(b)) => *a == b,
            _ => false,
        })
    }

    /// Screen column range `[x0, x1)` of the text column inside `area`.
    fn column_span(&self, area: Rect) -> (u16, u16) {
        let x0 = area.x + MARGIN.min(area.width);
        (x0, x0 + self.column)
    }

    /// Item under a screen position, given the page area and scroll offset.
    pub fn hit(&self, area: Rect, offset: u32, col: u16, row: u16) -> Option<HomeItem> {
        let (x0, x1) = self.column_span(area);
        if col < x0 || col >= x1 || row < area.y || row >= area.y + area.height {
            return None;
        }
        self.item_at((row - area.y) as usize + offset as usize)
    }
}

fn column_width(width: u16) -> u16 {
    let avail = width.saturating_sub(MARGIN * 2).max(1);
    // Leave the right half for the marble on wide layouts.
    let avail = if width >= TRAVEL_MIN_WIDTH {
        avail.min(width / 2 - MARGIN)
    } else {
        avail
    };
    avail.min(MAX_COLUMN)
}

/// Greedy word wrap.  Words longer than the width are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let len = line.chars().count();
        if len > 0 && len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draws a [`HomeDocument`] at a row offset.  Only text cells are written,
/// so whatever was drawn underneath (the marble) shows through the gaps.
pub struct HomeWidget<'a> {
    pub document: &'a HomeDocument,
    pub portfolio: &'a Portfolio,
    pub offset: u32,
    pub selected: Option<HomeItem>,
    pub hovered: Option<usize>,
    /// Page opacity (entrance and exit fades).
    pub alpha: f64,
}

impl HomeWidget<'_> {
    fn line(&self, row: &Row) -> Option<Line<'static>> {
        let p = self.portfolio;
        let column = self.document.column as usize;
        let highlighted = |item: HomeItem| {
            self.selected == Some(item)
                || matches!(item, HomeItem::Work(i) if self.hovered == Some(i))
        };
        let line = match row {
            Row::Blank => return None,
            Row::Name => Line::from(Span::styled(p.profile.name.to_uppercase(), Theme::name_style())),
            Row::Tagline => Line::from(Span::styled(p.profile.tagline.clone(), Theme::tagline_style())),
            Row::Heading(title) => Line::from(Span::styled(*title, Theme::section_style())),
            Row::Text(text) => Line::from(Span::styled(text.clone(), Theme::body_style())),
            Row::Email => {
                let email = p.profile.email.as_deref().unwrap_or_default();
                Line::from(Span::styled(email.to_string(), Theme::link_style()))
            }
            Row::Work(i) => {
                let work = p.works.get(*i)?;
                let name_w = work.name.chars().count();
                let cat_w = work.category.chars().count();
                let dots = column.saturating_sub(name_w + cat_w + 2).max(1);
                let name_style = if highlighted(HomeItem::Work(*i)) {
                    Theme::selected_style().fg(Theme::accent(*i))
                } else {
                    Theme::body_style()
                };
                Line::from(vec![
                    Span::styled(work.name.clone(), name_style),
                    Span::styled(format!(" {} ", "·".repeat(dots)), Theme::muted_style()),
                    Span::styled(work.category.clone(), Theme::muted_style()),
                ])
            }
            Row::Social(i) => {
                let social = p.socials.get(*i)?;
                let style = if highlighted(HomeItem::Social(*i)) {
                    Theme::selected_style()
                } else {
                    Theme::link_style()
                };
                Line::from(vec![
                    Span::styled(social.name.clone(), style),
                    Span::styled(format!("  {}", social.href), Theme::muted_style()),
                ])
            }
        };
        Some(line)
    }
}

impl Widget for HomeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.alpha <= 0.0 || area.width == 0 {
            return;
        }
        let (x0, x1) = self.document.column_span(area);
        let width = x1.min(area.x + area.width).saturating_sub(x0);
        for y in 0..area.height {
            let index = self.offset as usize + y as usize;
            let Some(row) = self.document.rows.get(index) else {
                break;
            };
            let Some(line) = self.line(row) else {
                continue;
            };
            let line = Line::from(
                line.spans
                    .into_iter()
                    .map(|s| {
                        let style: Style = fade_style(s.style, self.alpha);
                        Span::styled(s.content, style)
                    })
                    .collect::<Vec<_>>(),
            );
            buf.set_line(x0, area.y + y, &line, width);
        }
    }
}
