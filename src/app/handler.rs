//! Input handling — maps key/mouse events and frame ticks to state mutations.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::core::smooth_scroll::{Viewport, WheelInput};
use crate::shell::clipboard;
use crate::ui::gallery::Panel;
use crate::ui::layout::{point_in_rect, AppLayout};

use super::image_runtime::{spawn_decode, ImageUpdate};
use super::state::{
    home_index, home_item, home_item_count, ActiveView, AppState, GalleryView, HomeItem,
    HomeView, PanelImage,
};
use super::transition::{PageTransition, Route, HOME_EXIT, PROJECT_EXIT};

/// Marble follower steps never advance by more than this, so a stalled
/// loop doesn't teleport it.
const MAX_FRAME_DT: Duration = Duration::from_millis(100);

/// Keyboard nudges move this many wheel notches.
const KEY_SCROLL_NOTCHES: f64 = 4.0;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    if action == Action::Quit {
        state.should_quit = true;
        return;
    }
    // The page is on its way out; only quitting still works.
    if state.transition.is_leaving() {
        return;
    }
    state.status_message = None;

    match state.active_view {
        ActiveView::Home => handle_home_action(state, action, now),
        ActiveView::Project => handle_gallery_action(state, action, now),
    }
}

// ── Home ────────────────────────────────────────────────────────

fn handle_home_action(state: &mut AppState, action: Action, now: Instant) {
    let count = home_item_count(&state.portfolio);
    match action {
        Action::MoveUp => {
            state.home.selected = state.home.selected.saturating_sub(1);
            reveal_selected(state);
        }
        Action::MoveDown => {
            if state.home.selected + 1 < count {
                state.home.selected += 1;
            }
            reveal_selected(state);
        }
        Action::Open => {
            if let Some(item) = home_item(&state.portfolio, state.home.selected) {
                activate(state, item, now);
            }
        }
        Action::CopyLink => match home_item(&state.portfolio, state.home.selected) {
            Some(HomeItem::Social(i)) => copy_social(state, i),
            _ => state.status_message = Some("Select a link to copy".into()),
        },
        Action::ScrollStart => state.home.scroll.scroll_to(0.0),
        Action::ScrollEnd => state.home.scroll.scroll_to(f64::MAX),
        Action::ScrollLeft | Action::ScrollRight | Action::Back | Action::Quit => {}
    }
}

/// Ease the page so the selected row sits inside the viewport with a
/// little context around it.
fn reveal_selected(state: &mut AppState) {
    const CONTEXT: f64 = 3.0;
    let home = &mut state.home;
    let Some(item) = home_item(&state.portfolio, home.selected) else {
        return;
    };
    let Some(row) = home.document.as_ref().and_then(|d| d.row_of(item)) else {
        return;
    };
    let Some(extents) = home.scroll.viewport().extents() else {
        return;
    };
    let row = row as f64;
    let top = home.scroll.target();
    if row < top + CONTEXT {
        home.scroll.scroll_to(row - CONTEXT);
    } else if row + 1.0 > top + extents.viewport - CONTEXT {
        home.scroll.scroll_to(row + 1.0 + CONTEXT - extents.viewport);
    }
}

fn activate(state: &mut AppState, item: HomeItem, now: Instant) {
    match item {
        HomeItem::Work(i) => {
            let Some(slug) = state.portfolio.works.get(i).map(|w| w.slug.clone()) else {
                return;
            };
            open_project(state, slug, now);
        }
        HomeItem::Social(i) => copy_social(state, i),
    }
}

fn open_project(state: &mut AppState, slug: String, now: Instant) {
    if state.portfolio.project(&slug).is_none() {
        tracing::warn!(slug = %slug, "work links to a missing project");
        state.status_message = Some(format!("No project page for \"{slug}\""));
        return;
    }
    state.transition.leave(Route::Project(slug), HOME_EXIT, now);
}

fn copy_social(state: &mut AppState, index: usize) {
    let Some(social) = state.portfolio.socials.get(index) else {
        return;
    };
    let href = social.href.clone();
    state.status_message = Some(match clipboard::copy_to_clipboard(&href) {
        Some(helper) => format!("Copied {href} via {helper}"),
        None => format!("{href} (printed on exit)"),
    });
    state.copied_link = Some(href);
}

// ── Gallery ─────────────────────────────────────────────────────

fn handle_gallery_action(state: &mut AppState, action: Action, now: Instant) {
    if action == Action::Back {
        close_project(state, now);
        return;
    }
    let step = state.config.wheel_step * KEY_SCROLL_NOTCHES;
    let Some(gallery) = state.gallery.as_mut() else {
        return;
    };
    match action {
        Action::ScrollLeft | Action::MoveUp => gallery.scroll.scroll_by(-step),
        Action::ScrollRight | Action::MoveDown => gallery.scroll.scroll_by(step),
        Action::ScrollStart => gallery.scroll.scroll_to(0.0),
        Action::ScrollEnd => gallery.scroll.scroll_to(f64::MAX),
        Action::Back | Action::Open | Action::CopyLink | Action::Quit => {}
    }
}

fn close_project(state: &mut AppState, now: Instant) {
    state
        .transition
        .leave(Route::Home { at_works: true }, PROJECT_EXIT, now);
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    if state.transition.is_leaving() {
        return;
    }
    let layout = AppLayout::from_area(state.terminal_area);

    if let Some(mut input) = wheel_input(mouse.kind, state.config.wheel_step) {
        match state.active_view {
            ActiveView::Home => state.home.scroll.on_wheel_input(&mut input),
            ActiveView::Project => {
                if let Some(gallery) = state.gallery.as_mut() {
                    gallery.scroll.on_wheel_input(&mut input);
                }
            }
        }
        if !input.default_prevented() {
            tracing::trace!("wheel before layout ignored");
        }
        return;
    }

    match state.active_view {
        ActiveView::Home => handle_home_mouse(state, mouse, &layout, now),
        ActiveView::Project => handle_gallery_mouse(state, mouse, &layout, now),
    }
}

/// Wheel notch → input event.  Vertical and horizontal notches both feed
/// the one offset.
fn wheel_input(kind: MouseEventKind, step: f64) -> Option<WheelInput> {
    match kind {
        MouseEventKind::ScrollDown => Some(WheelInput::new(0.0, step)),
        MouseEventKind::ScrollUp => Some(WheelInput::new(0.0, -step)),
        MouseEventKind::ScrollRight => Some(WheelInput::new(step, 0.0)),
        MouseEventKind::ScrollLeft => Some(WheelInput::new(-step, 0.0)),
        _ => None,
    }
}

fn handle_home_mouse(state: &mut AppState, mouse: MouseEvent, layout: &AppLayout, now: Instant) {
    let hit = state.home.document.as_ref().and_then(|doc| {
        doc.hit(
            layout.page_area,
            state.home.scroll.viewport().cell_offset(),
            mouse.column,
            mouse.row,
        )
    });
    match mouse.kind {
        MouseEventKind::Moved => {
            state.home.hovered = match hit {
                Some(HomeItem::Work(i)) => Some(i),
                _ => None,
            };
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(item) = hit {
                state.home.selected = home_index(&state.portfolio, item);
                state.status_message = None;
                activate(state, item, now);
            }
        }
        _ => {}
    }
}

fn handle_gallery_mouse(
    state: &mut AppState,
    mouse: MouseEvent,
    layout: &AppLayout,
    now: Instant,
) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if point_in_rect(layout.close_button(), mouse.column, mouse.row) {
        close_project(state, now);
        return;
    }
    let Some(gallery) = state.gallery.as_ref() else {
        return;
    };
    let page = layout.page_area;
    if !gallery.images_settled() || !point_in_rect(page, mouse.column, mouse.row) {
        return;
    }
    let panel = gallery.strip.as_ref().and_then(|strip| {
        strip.panel_at(
            gallery.scroll.viewport().cell_offset(),
            mouse.column - page.x,
            mouse.row - page.y,
        )
    });
    if panel == Some(Panel::Close) {
        close_project(state, now);
    }
}

// ── Frames ──────────────────────────────────────────────────────

/// One frame: dispatch due frame handles to the scroll controllers, advance
/// the marble, and carry out a navigation whose exit fade has finished.
pub fn on_frame(state: &mut AppState, dt: Duration, now: Instant) {
    for handle in state.clock.begin_frame() {
        state.home.scroll.on_frame(handle);
        if let Some(gallery) = state.gallery.as_mut() {
            gallery.scroll.on_frame(handle);
        }
    }

    if !state.home.marble.is_settled() {
        state.home.marble.step(dt.min(MAX_FRAME_DT));
    }

    if let Some(route) = state.transition.due(now).cloned() {
        navigate(state, route, now);
    }
}

/// Switch pages.  The page being left is torn down: its scroll controller is
/// disposed (cancelling any pending frame) and, for a project, its image
/// decoders are cancelled.
pub fn navigate(state: &mut AppState, route: Route, now: Instant) {
    match route {
        Route::Project(slug) => {
            let Some(project) = state.portfolio.project(&slug) else {
                state.status_message = Some(format!("No project page for \"{slug}\""));
                state.transition = PageTransition::mount(now);
                return;
            };
            let paths = project.image_paths(&state.assets);
            state.image_generation += 1;
            let generation = state.image_generation;
            tracing::info!(slug = %slug, images = paths.len(), generation, "opening project");

            if state.home.scroll.is_animating() {
                tracing::debug!(offset = state.home.scroll.current(), "home scroll interrupted");
            }
            state.home.scroll.dispose();
            let mut gallery = GalleryView::new(
                slug,
                paths.len(),
                generation,
                state.clock.clone(),
                &state.config,
            );
            gallery.decode = Some(spawn_decode(state.image_tx.clone(), generation, paths));
            state.gallery = Some(gallery);
            state.active_view = ActiveView::Project;
        }
        Route::Home { at_works } => {
            let closed = state.gallery.take().map(|g| g.slug.clone());
            tracing::info!(closed = ?closed, "returning home");

            let mut home = HomeView::new(state.clock.clone(), &state.config);
            home.jump_to_works = at_works;
            // Keep the project that was open selected.
            if let Some(i) = closed
                .as_deref()
                .and_then(|slug| state.portfolio.works.iter().position(|w| w.slug == slug))
            {
                home.selected = i;
            }
            state.home = home;
            state.active_view = ActiveView::Home;
        }
    }
    state.transition = PageTransition::mount(now);
}

/// Store a decode result, unless it belongs to a gallery that's gone.
pub fn apply_image_update(state: &mut AppState, update: ImageUpdate) {
    let Some(gallery) = state.gallery.as_mut() else {
        return;
    };
    if gallery.generation != update.generation {
        tracing::debug!(
            generation = update.generation,
            current = gallery.generation,
            "stale image result dropped"
        );
        return;
    }
    let Some(slot) = gallery.images.get_mut(update.index) else {
        return;
    };
    *slot = match update.result {
        Ok(img) => PanelImage::Ready(img),
        Err(_) => PanelImage::Failed,
    };
    if gallery.images_settled() {
        tracing::debug!(slug = %gallery.slug, "all images settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::content::Portfolio;
    use crate::ui::screen;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn state_with_rx() -> (AppState, mpsc::UnboundedReceiver<ImageUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(
            Portfolio::builtin().unwrap(),
            std::path::PathBuf::from("/nonexistent-assets"),
            AppConfig::default(),
            tx,
            Instant::now(),
        );
        state.terminal_area = Rect::new(0, 0, 100, 30);
        (state, rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn page(state: &AppState) -> Rect {
        AppLayout::from_area(state.terminal_area).page_area
    }

    /// Run frames until nothing is pending or `limit` is hit.
    fn pump(state: &mut AppState, now: Instant, limit: usize) {
        for _ in 0..limit {
            if !state.clock.has_pending() {
                break;
            }
            on_frame(state, Duration::from_millis(16), now);
        }
    }

    #[test]
    fn wheel_before_layout_is_ignored() {
        let (mut state, _rx) = state_with_rx();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 5, 5), Instant::now());
        assert_eq!(state.home.scroll.target(), 0.0);
        assert!(!state.clock.has_pending());
    }

    #[test]
    fn wheel_scrolls_home_smoothly() {
        let (mut state, _rx) = state_with_rx();
        let now = Instant::now();
        let area = page(&state);
        screen::layout_home(&mut state, area);

        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 5, 5), now);
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 5, 5), now);
        assert_eq!(state.home.scroll.target(), 12.0);
        assert!(state.clock.has_pending());

        on_frame(&mut state, Duration::from_millis(16), now);
        let first = state.home.scroll.current();
        assert!(first > 0.0 && first < 12.0);

        pump(&mut state, now, 1000);
        assert_eq!(state.home.scroll.current(), 12.0);
    }

    #[test]
    fn open_waits_for_exit_fade() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        handle_key(&mut state, key(KeyCode::Enter), t0);
        assert!(state.transition.is_leaving());
        assert_eq!(state.active_view, ActiveView::Home);

        on_frame(&mut state, Duration::from_millis(16), t0 + Duration::from_millis(300));
        assert_eq!(state.active_view, ActiveView::Home);

        on_frame(&mut state, Duration::from_millis(16), t0 + HOME_EXIT);
        assert_eq!(state.active_view, ActiveView::Project);
        let gallery = state.gallery.as_ref().unwrap();
        assert_eq!(gallery.slug, state.portfolio.works[0].slug);
        assert!(state.home.scroll.is_disposed());
    }

    #[test]
    fn input_is_ignored_while_leaving_except_quit() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        handle_key(&mut state, key(KeyCode::Enter), t0);
        handle_key(&mut state, key(KeyCode::Down), t0);
        assert_eq!(state.home.selected, 0);
        handle_key(&mut state, key(KeyCode::Char('q')), t0);
        assert!(state.should_quit);
    }

    #[test]
    fn closing_a_project_returns_to_works() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        navigate(&mut state, Route::Project("qswap".into()), t0);
        let clock = state.clock.clone();

        // Leave a frame pending on the gallery.
        let area = page(&state);
        screen::layout_gallery(&mut state, area);
        state.gallery.as_mut().unwrap().scroll.scroll_by(30.0);
        assert!(clock.has_pending());

        handle_key(&mut state, key(KeyCode::Esc), t0);
        on_frame(&mut state, Duration::from_millis(16), t0 + PROJECT_EXIT);
        assert_eq!(state.active_view, ActiveView::Home);
        assert!(state.gallery.is_none());
        assert!(!clock.has_pending());
        assert!(state.home.jump_to_works);
        let qswap = state.portfolio.works.iter().position(|w| w.slug == "qswap");
        assert_eq!(Some(state.home.selected), qswap);
    }

    #[test]
    fn stale_image_results_are_dropped() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        navigate(&mut state, Route::Project("qswap".into()), t0);
        let generation = state.gallery.as_ref().unwrap().generation;

        apply_image_update(
            &mut state,
            ImageUpdate {
                generation: generation + 5,
                index: 0,
                result: Ok(Arc::new(image::RgbaImage::new(2, 2))),
            },
        );
        assert!(matches!(state.gallery.as_ref().unwrap().images[0], PanelImage::Pending));

        apply_image_update(
            &mut state,
            ImageUpdate {
                generation,
                index: 0,
                result: Err("broken".into()),
            },
        );
        assert!(matches!(state.gallery.as_ref().unwrap().images[0], PanelImage::Failed));
    }

    #[test]
    fn unknown_project_sets_status() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        open_project(&mut state, "nope".into(), t0);
        assert!(!state.transition.is_leaving());
        assert!(state.status_message.as_deref().unwrap().contains("nope"));
    }

    #[test]
    fn arrow_keys_scroll_the_strip() {
        let (mut state, _rx) = state_with_rx();
        let t0 = Instant::now();
        navigate(&mut state, Route::Project("qswap".into()), t0);
        let area = page(&state);
        screen::layout_gallery(&mut state, area);
        handle_key(&mut state, key(KeyCode::Right), t0);
        let gallery = state.gallery.as_ref().unwrap();
        assert_eq!(gallery.scroll.target(), 24.0);
    }

    #[test]
    fn hovering_a_work_highlights_it() {
        let (mut state, _rx) = state_with_rx();
        let area = page(&state);
        screen::layout_home(&mut state, area);
        let row = state
            .home
            .document
            .as_ref()
            .unwrap()
            .row_of(HomeItem::Work(3))
            .unwrap() as u16;
        handle_mouse(&mut state, mouse(MouseEventKind::Moved, 6, row), Instant::now());
        assert_eq!(state.home.hovered, Some(3));
        handle_mouse(&mut state, mouse(MouseEventKind::Moved, 6, 0), Instant::now());
        assert_eq!(state.home.hovered, None);
    }
}
