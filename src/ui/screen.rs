//! Frame composition.
//!
//! Drawing is also where layout happens: the page size is only known here,
//! so the home document and gallery strip are (re)built on demand and their
//! extents handed to the smooth-scroll viewports before anything is drawn.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::state::{home_item, ActiveView, AppState, PanelImage};
use crate::app::transition::{HOME_FADE_IN, INFO_REVEAL, TITLE_REVEAL};
use crate::core::choreography::Choreography;

use super::gallery::{GalleryWidget, StripLayout};
use super::home::{HomeDocument, HomeWidget};
use super::layout::{AppLayout, CLOSE_LABEL};
use super::marble::Marble;
use super::theme::{fade_style, Theme};

pub fn draw(frame: &mut Frame, state: &mut AppState, now: Instant) {
    let area = frame.area();
    state.terminal_area = area;
    let layout = AppLayout::from_area(area);

    match state.active_view {
        ActiveView::Home => draw_home(frame, state, layout.page_area, now),
        ActiveView::Project => draw_project(frame, state, &layout, now),
    }
    draw_status(frame, state, layout.status_area);
}

// ── home ────────────────────────────────────────────────────────

/// Rebuild the home document if the page size changed and keep the scroll
/// extents and marble target in sync with it.
pub fn layout_home(state: &mut AppState, area: Rect) {
    let home = &mut state.home;
    let stale = !home
        .document
        .as_ref()
        .is_some_and(|d| d.fits(area.width, area.height));
    if stale {
        let doc = HomeDocument::build(&state.portfolio, area.width, area.height);
        tracing::debug!(width = area.width, height = area.height, rows = doc.height(), "home laid out");
        let fresh = home.document.is_none();
        home.scroll.viewport_mut().set_extents(doc.height(), area.height);
        if home.jump_to_works {
            home.jump_to_works = false;
            home.scroll.jump_to(doc.marks().works_top);
        } else {
            // Re-clamp against the new extents.
            let target = home.scroll.target();
            home.scroll.scroll_to(target);
        }
        let pose = Choreography::new(doc.marks(), area.height as f64, doc.travel_enabled())
            .pose_at(home.scroll.current());
        if fresh {
            home.marble.snap(pose);
        }
        home.document = Some(doc);
    }

    if let Some(doc) = home.document.as_ref() {
        let choreography =
            Choreography::new(doc.marks(), area.height as f64, doc.travel_enabled());
        home.marble.set_target(choreography.pose_at(home.scroll.current()));
    }
}

fn draw_home(frame: &mut Frame, state: &mut AppState, area: Rect, now: Instant) {
    layout_home(state, area);
    let home = &state.home;
    let Some(document) = home.document.as_ref() else {
        return;
    };
    let alpha = state.transition.opacity(HOME_FADE_IN, now);
    let tint = home
        .highlighted_work(state.portfolio.works.len())
        .map(Theme::accent)
        .unwrap_or_else(Theme::marble_base);

    frame.render_widget(
        Marble {
            pose: home.marble.pose(),
            tint,
            alpha,
        },
        area,
    );
    frame.render_widget(
        HomeWidget {
            document,
            portfolio: &state.portfolio,
            offset: home.scroll.viewport().cell_offset(),
            selected: home_item(&state.portfolio, home.selected),
            hovered: home.hovered,
            alpha,
        },
        area,
    );
}

// ── project ─────────────────────────────────────────────────────

/// Lay out the open gallery's strip for `area` and latch the panels that
/// are now in view.
pub fn layout_gallery(state: &mut AppState, area: Rect) {
    let Some(gallery) = state.gallery.as_mut() else {
        return;
    };
    let aspects: Vec<Option<f64>> = gallery.images.iter().map(PanelImage::aspect).collect();
    let strip = StripLayout::build(area.width, area.height, &aspects);
    let changed = gallery.strip.as_ref() != Some(&strip);
    gallery
        .scroll
        .viewport_mut()
        .set_extents(strip.content_width, area.width);
    if changed {
        let target = gallery.scroll.target();
        gallery.scroll.scroll_to(target);
    }

    // Nothing but the details panel is on screen until the strip is ready.
    let ready = gallery.images_settled();
    let offset = gallery.scroll.viewport().cell_offset() as f64;
    let view = (offset, offset + area.width as f64);
    for span in &strip.panels {
        let Some(index) = span.panel.latch_index() else {
            continue;
        };
        if index > 0 && !ready {
            continue;
        }
        let extent = (f64::from(span.x), f64::from(span.end()));
        if gallery.seen.observe(index, extent, view) {
            tracing::trace!(panel = ?span.panel, seen = gallery.seen.seen_count(), "panel revealed");
        }
    }
    gallery.strip = Some(strip);
}

fn draw_project(frame: &mut Frame, state: &mut AppState, layout: &AppLayout, now: Instant) {
    let area = layout.page_area;
    layout_gallery(state, area);
    let Some(gallery) = state.gallery.as_ref() else {
        return;
    };
    let (Some(project), Some(strip)) = (
        state.portfolio.project(&gallery.slug),
        gallery.strip.as_ref(),
    ) else {
        return;
    };
    let alpha = state.transition.opacity(std::time::Duration::ZERO, now);

    frame.render_widget(
        GalleryWidget {
            project,
            gallery,
            layout: strip,
            offset: gallery.scroll.viewport().cell_offset(),
            title_shown: state.transition.revealed(TITLE_REVEAL, now),
            info_shown: state.transition.revealed(INFO_REVEAL, now),
            alpha,
            tick: state.tick,
        },
        area,
    );

    let close = Paragraph::new(Line::from(Span::styled(
        CLOSE_LABEL,
        fade_style(Theme::close_style(), alpha),
    )));
    frame.render_widget(close, layout.close_button());
}

// ── status bar ──────────────────────────────────────────────────

fn draw_status(frame: &mut Frame, state: &AppState, area: Rect) {
    let text = match &state.status_message {
        Some(message) => message.clone(),
        None => match state.active_view {
            ActiveView::Home => state.config.home_hint(),
            ActiveView::Project => state.config.gallery_hint(),
        },
    };
    let bar = Paragraph::new(Line::from(format!(" {text}"))).style(Theme::status_bar_style());
    frame.render_widget(bar, area);
}
