//! Page transitions — staged entrances and delayed navigation.
//!
//! Pages don't appear or disappear instantly.  On mount a page fades in
//! (and the project page reveals its title, then its info block); when
//! leaving, the page fades out first and the route change happens only
//! once the fade has run its course.

use std::time::{Duration, Instant};

/// Home page becomes visible this long after mount.
pub const HOME_FADE_IN: Duration = Duration::from_millis(100);
/// Home page fade-out before opening a project.
pub const HOME_EXIT: Duration = Duration::from_millis(700);
/// Project title reveal delay.
pub const TITLE_REVEAL: Duration = Duration::from_millis(200);
/// Project description/details reveal delay.
pub const INFO_REVEAL: Duration = Duration::from_millis(400);
/// Project page fade-out before returning home.
pub const PROJECT_EXIT: Duration = Duration::from_millis(500);

/// Navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Home page, optionally scrolled to the works section.
    Home { at_works: bool },
    Project(String),
}

#[derive(Debug, Clone)]
struct Leaving {
    since: Instant,
    duration: Duration,
    to: Route,
}

/// Entrance/exit timing of the current page.
#[derive(Debug, Clone)]
pub struct PageTransition {
    mounted_at: Instant,
    leaving: Option<Leaving>,
}

impl PageTransition {
    pub fn mount(now: Instant) -> Self {
        Self {
            mounted_at: now,
            leaving: None,
        }
    }

    /// Time since mount has passed `delay`.
    pub fn revealed(&self, delay: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.mounted_at) >= delay
    }

    /// Start fading out toward `to`.  A second call while already leaving
    /// is ignored: the first destination wins.
    pub fn leave(&mut self, to: Route, duration: Duration, now: Instant) {
        if self.leaving.is_some() {
            return;
        }
        tracing::debug!(?to, ?duration, "page leaving");
        self.leaving = Some(Leaving {
            since: now,
            duration,
            to,
        });
    }

    pub fn is_leaving(&self) -> bool {
        self.leaving.is_some()
    }

    /// Opacity of the page: 0 before `fade_in` has elapsed, then 1, then
    /// falling linearly to 0 over the exit fade.
    pub fn opacity(&self, fade_in: Duration, now: Instant) -> f64 {
        if !self.revealed(fade_in, now) {
            return 0.0;
        }
        match &self.leaving {
            None => 1.0,
            Some(l) if l.duration.is_zero() => 0.0,
            Some(l) => {
                let t = now.saturating_duration_since(l.since).as_secs_f64()
                    / l.duration.as_secs_f64();
                (1.0 - t).clamp(0.0, 1.0)
            }
        }
    }

    /// The destination, once the exit fade has finished.
    pub fn due(&self, now: Instant) -> Option<&Route> {
        self.leaving
            .as_ref()
            .filter(|l| now.saturating_duration_since(l.since) >= l.duration)
            .map(|l| &l.to)
    }

    /// Whether a timed change is still ahead (used to keep frames coming).
    pub fn has_pending(&self, now: Instant) -> bool {
        self.leaving.is_some() || !self.revealed(INFO_REVEAL, now)
    }
}
