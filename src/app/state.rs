//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::app::image_runtime::{DecodeBatch, ImageUpdate};
use crate::app::transition::PageTransition;
use crate::config::AppConfig;
use crate::core::{
    choreography::{MarblePose, Scrub},
    content::Portfolio,
    frame::FrameClock,
    smooth_scroll::{Extents, SmoothScroll, Viewport},
    visibility::{VisibilityLatch, DEFAULT_THRESHOLD},
};
use crate::ui::{gallery::StripLayout, home::HomeDocument};

/// Which page is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Home,
    Project,
}

// ───────────────────────────────────────── viewport ──────────

/// Scroll pane as seen by a smooth-scroll controller.  The renderer fills in
/// the extents after each layout; the controller writes `offset`.
#[derive(Debug, Clone, Default)]
pub struct PaneViewport {
    extents: Option<Extents>,
    offset: f64,
}

impl PaneViewport {
    pub fn set_extents(&mut self, content: u32, viewport: u16) {
        self.extents = Some(Extents::new(f64::from(content), f64::from(viewport)));
    }

    /// Applied offset, rounded to whole cells.
    pub fn cell_offset(&self) -> u32 {
        self.offset.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

impl Viewport for PaneViewport {
    fn extents(&self) -> Option<Extents> {
        self.extents
    }

    fn apply(&mut self, offset: f64) {
        self.offset = offset;
    }
}

pub type PaneScroll = SmoothScroll<FrameClock, PaneViewport>;

// ───────────────────────────────────────── home ──────────────

/// Something selectable on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Work(usize),
    Social(usize),
}

pub struct HomeView {
    /// Vertical page scroll (rows).
    pub scroll: PaneScroll,
    /// Keyboard selection: works first, then socials (see [`home_item`]).
    pub selected: usize,
    /// Work under the mouse pointer.
    pub hovered: Option<usize>,
    /// Last laid-out document, for hit-testing and choreography.
    pub document: Option<HomeDocument>,
    /// Marble pose follower.
    pub marble: Scrub,
    /// Jump to the works section once the document is laid out.
    pub jump_to_works: bool,
}

impl HomeView {
    pub fn new(clock: FrameClock, config: &AppConfig) -> Self {
        Self {
            scroll: SmoothScroll::new(clock, PaneViewport::default(), config.tuning),
            selected: 0,
            hovered: None,
            document: None,
            marble: Scrub::new(MarblePose::REST, config.scrub_lag),
            jump_to_works: false,
        }
    }

    /// Work whose accent tints the marble: hover beats keyboard selection.
    pub fn highlighted_work(&self, works: usize) -> Option<usize> {
        self.hovered.or(match self.selected {
            i if i < works => Some(i),
            _ => None,
        })
    }
}

/// Map a flat selection index onto works followed by socials.
pub fn home_item(portfolio: &Portfolio, index: usize) -> Option<HomeItem> {
    let works = portfolio.works.len();
    if index < works {
        Some(HomeItem::Work(index))
    } else if index - works < portfolio.socials.len() {
        Some(HomeItem::Social(index - works))
    } else {
        None
    }
}

pub fn home_item_count(portfolio: &Portfolio) -> usize {
    portfolio.works.len() + portfolio.socials.len()
}

/// Inverse of [`home_item`].
pub fn home_index(portfolio: &Portfolio, item: HomeItem) -> usize {
    match item {
        HomeItem::Work(i) => i,
        HomeItem::Social(i) => portfolio.works.len() + i,
    }
}

// ───────────────────────────────────────── gallery ───────────

/// Decode state of one gallery image.
#[derive(Debug, Clone)]
pub enum PanelImage {
    Pending,
    Ready(Arc<image::RgbaImage>),
    Failed,
}

impl PanelImage {
    pub fn is_settled(&self) -> bool {
        !matches!(self, PanelImage::Pending)
    }

    /// Width / height, when known.
    pub fn aspect(&self) -> Option<f64> {
        match self {
            PanelImage::Ready(img) if img.height() > 0 => {
                Some(img.width() as f64 / img.height() as f64)
            }
            _ => None,
        }
    }
}

/// One open project page.
pub struct GalleryView {
    pub slug: String,
    /// Horizontal strip scroll (columns).
    pub scroll: PaneScroll,
    pub images: Vec<PanelImage>,
    /// Panels that have scrolled into view at least once (details panel,
    /// then one per image).
    pub seen: VisibilityLatch,
    /// Generation id of the decode batch feeding `images`.
    pub generation: u64,
    /// Last laid-out strip, for hit-testing and visibility.
    pub strip: Option<StripLayout>,
    /// Keeps the decode workers alive; cancels them on drop.
    pub decode: Option<DecodeBatch>,
}

impl GalleryView {
    pub fn new(
        slug: String,
        image_count: usize,
        generation: u64,
        clock: FrameClock,
        config: &AppConfig,
    ) -> Self {
        Self {
            slug,
            scroll: SmoothScroll::new(clock, PaneViewport::default(), config.tuning),
            images: vec![PanelImage::Pending; image_count],
            seen: VisibilityLatch::new(image_count + 1, DEFAULT_THRESHOLD),
            generation,
            strip: None,
            decode: None,
        }
    }

    /// Every image has either decoded or failed.
    pub fn images_settled(&self) -> bool {
        self.images.iter().all(PanelImage::is_settled)
    }
}

impl Drop for GalleryView {
    fn drop(&mut self) {
        // Explicit so the ordering is obvious: stop scrolling, then stop
        // the decoders.
        self.scroll.dispose();
        if let Some(batch) = self.decode.take() {
            batch.cancel();
        }
    }
}

// ───────────────────────────────────────── app ───────────────

/// Top-level application state.
pub struct AppState {
    pub portfolio: Portfolio,
    /// Directory that site-rooted image paths resolve against.
    pub assets: PathBuf,
    pub config: AppConfig,
    /// Shared frame clock; every smooth-scroll controller requests frames here.
    pub clock: FrameClock,
    pub active_view: ActiveView,
    pub home: HomeView,
    pub gallery: Option<GalleryView>,
    /// Entrance/exit timing of the current page.
    pub transition: PageTransition,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Last link copied with the copy action, echoed on exit.
    pub copied_link: Option<String>,
    /// Full terminal area from the last draw.
    pub terminal_area: Rect,
    /// Monotonic counter driving the loading spinner.
    pub tick: u64,
    /// Source of decode generations.
    pub image_generation: u64,
    pub image_tx: mpsc::UnboundedSender<ImageUpdate>,
}

impl AppState {
    pub fn new(
        portfolio: Portfolio,
        assets: PathBuf,
        config: AppConfig,
        image_tx: mpsc::UnboundedSender<ImageUpdate>,
        now: Instant,
    ) -> Self {
        let clock = FrameClock::new();
        let home = HomeView::new(clock.clone(), &config);
        Self {
            portfolio,
            assets,
            config,
            clock,
            active_view: ActiveView::default(),
            home,
            gallery: None,
            transition: PageTransition::mount(now),
            should_quit: false,
            status_message: None,
            copied_link: None,
            terminal_area: Rect::default(),
            tick: 0,
            image_generation: 0,
            image_tx,
        }
    }

    /// Whether the event loop should keep ticking at frame rate.
    pub fn wants_frames(&self, now: Instant) -> bool {
        self.clock.has_pending()
            || !self.home.marble.is_settled()
            || self.transition.has_pending(now)
    }
}
