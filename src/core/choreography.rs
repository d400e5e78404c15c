//! Scroll-linked choreography for the home page marble.
//!
//! The marble sits behind the hero.  While the "selected works" section is
//! pinned it travels across to the space beside the list; once the about
//! section scrolls into view it drifts back and fades out.  Both legs are
//! eased with `power1.inOut` and the displayed pose trails the scroll-derived
//! one through a [`Scrub`] so fast scrolling still produces a slow glide.

use std::time::Duration;

/// Quadratic ease-in-out on `[0, 1]` (GSAP's `power1.inOut`).
pub fn ease_power1_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Where the marble is and how visible it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarblePose {
    /// 0 = centred behind the hero, 1 = parked beside the works list.
    pub travel: f64,
    /// 0 = invisible, 1 = opaque.
    pub alpha: f64,
}

impl MarblePose {
    pub const REST: MarblePose = MarblePose {
        travel: 0.0,
        alpha: 1.0,
    };

    fn lerp(self, to: MarblePose, t: f64) -> MarblePose {
        MarblePose {
            travel: self.travel + (to.travel - self.travel) * t,
            alpha: self.alpha + (to.alpha - self.alpha) * t,
        }
    }

    fn distance(self, other: MarblePose) -> f64 {
        (self.travel - other.travel)
            .abs()
            .max((self.alpha - other.alpha).abs())
    }
}

/// A scroll range `[start, end]` in offset units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn progress(&self, offset: f64) -> f64 {
        if self.end <= self.start {
            return if offset >= self.start { 1.0 } else { 0.0 };
        }
        ((offset - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// Section positions of the home document (rows from the top).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMarks {
    pub works_top: f64,
    pub works_bottom: f64,
    pub about_top: f64,
}

/// Maps home-page scroll offsets to marble poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choreography {
    pin: Span,
    fade: Span,
    /// Narrow layouts skip the travel leg and only fade.
    travel_enabled: bool,
}

impl Choreography {
    pub fn new(marks: SectionMarks, viewport: f64, travel_enabled: bool) -> Self {
        Self {
            // Works top at viewport top → works bottom at viewport bottom.
            pin: Span {
                start: marks.works_top,
                end: marks.works_bottom - viewport,
            },
            // About top enters at the bottom → about top at the top.
            fade: Span {
                start: marks.about_top - viewport,
                end: marks.about_top,
            },
            travel_enabled,
        }
    }

    pub fn pose_at(&self, offset: f64) -> MarblePose {
        let travel_in = if self.travel_enabled {
            ease_power1_in_out(self.pin.progress(offset))
        } else {
            0.0
        };
        let fade = ease_power1_in_out(self.fade.progress(offset));
        MarblePose {
            travel: travel_in * (1.0 - fade),
            alpha: 1.0 - fade,
        }
    }
}

/// Lagging follower: the shown pose catches up with the scroll-derived pose
/// over roughly `lag`.
#[derive(Debug, Clone)]
pub struct Scrub {
    shown: MarblePose,
    target: MarblePose,
    lag: Duration,
}

impl Scrub {
    /// GSAP `scrub: 2`.
    pub const DEFAULT_LAG: Duration = Duration::from_secs(2);

    const SETTLE: f64 = 1e-3;

    pub fn new(start: MarblePose, lag: Duration) -> Self {
        Self {
            shown: start,
            target: start,
            lag,
        }
    }

    pub fn set_target(&mut self, target: MarblePose) {
        self.target = target;
    }

    /// Snap to the target (layout changes, page re-entry).
    pub fn snap(&mut self, pose: MarblePose) {
        self.shown = pose;
        self.target = pose;
    }

    /// Advance by `dt`.  Returns `true` once settled.
    pub fn step(&mut self, dt: Duration) -> bool {
        let lag = self.lag.as_secs_f64();
        let k = if lag <= 0.0 {
            1.0
        } else {
            // ~98% of the gap is closed after `lag`.
            1.0 - (-dt.as_secs_f64() * 4.0 / lag).exp()
        };
        self.shown = self.shown.lerp(self.target, k);
        if self.shown.distance(self.target) < Self::SETTLE {
            self.shown = self.target;
        }
        self.is_settled()
    }

    pub fn is_settled(&self) -> bool {
        self.shown == self.target
    }

    pub fn pose(&self) -> MarblePose {
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks() -> SectionMarks {
        SectionMarks {
            works_top: 40.0,
            works_bottom: 100.0,
            about_top: 140.0,
        }
    }

    #[test]
    fn ease_endpoints_and_symmetry() {
        assert_eq!(ease_power1_in_out(0.0), 0.0);
        assert_eq!(ease_power1_in_out(1.0), 1.0);
        assert!((ease_power1_in_out(0.5) - 0.5).abs() < 1e-12);
        for t in [0.1, 0.25, 0.4] {
            let a = ease_power1_in_out(t);
            let b = ease_power1_in_out(1.0 - t);
            assert!((a + b - 1.0).abs() < 1e-12);
        }
        assert_eq!(ease_power1_in_out(-3.0), 0.0);
        assert_eq!(ease_power1_in_out(7.0), 1.0);
    }

    #[test]
    fn rests_before_the_pin() {
        let c = Choreography::new(marks(), 30.0, true);
        assert_eq!(c.pose_at(0.0), MarblePose::REST);
        assert_eq!(c.pose_at(40.0), MarblePose::REST);
    }

    #[test]
    fn fully_travelled_at_pin_end() {
        // pin: 40 → 70, fade: 110 → 140
        let c = Choreography::new(marks(), 30.0, true);
        let mid = c.pose_at(55.0);
        assert!((mid.travel - 0.5).abs() < 1e-12);
        let end = c.pose_at(70.0);
        assert_eq!(end.travel, 1.0);
        assert_eq!(end.alpha, 1.0);
        assert_eq!(c.pose_at(100.0).travel, 1.0);
    }

    #[test]
    fn fades_out_over_about_entry() {
        let c = Choreography::new(marks(), 30.0, true);
        let half = c.pose_at(125.0);
        assert!((half.alpha - 0.5).abs() < 1e-12);
        assert!((half.travel - 0.5).abs() < 1e-12);
        let gone = c.pose_at(200.0);
        assert_eq!(gone.alpha, 0.0);
        assert_eq!(gone.travel, 0.0);
    }

    #[test]
    fn narrow_layout_never_travels() {
        let c = Choreography::new(marks(), 30.0, false);
        assert_eq!(c.pose_at(70.0).travel, 0.0);
        assert_eq!(c.pose_at(200.0).alpha, 0.0);
    }

    #[test]
    fn short_section_pins_as_a_step() {
        // Works section shorter than the viewport: pin end before its start.
        let c = Choreography::new(
            SectionMarks {
                works_top: 10.0,
                works_bottom: 20.0,
                about_top: 500.0,
            },
            30.0,
            true,
        );
        assert_eq!(c.pose_at(9.0).travel, 0.0);
        assert_eq!(c.pose_at(10.0).travel, 1.0);
    }

    #[test]
    fn scrub_trails_then_settles() {
        let mut s = Scrub::new(MarblePose::REST, Scrub::DEFAULT_LAG);
        s.set_target(MarblePose {
            travel: 1.0,
            alpha: 1.0,
        });
        assert!(!s.step(Duration::from_millis(16)));
        let early = s.pose().travel;
        assert!(early > 0.0 && early < 0.1);

        let mut frames = 0;
        while !s.step(Duration::from_millis(16)) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(s.pose().travel, 1.0);
    }

    #[test]
    fn zero_lag_is_immediate() {
        let mut s = Scrub::new(MarblePose::REST, Duration::ZERO);
        let to = MarblePose {
            travel: 0.3,
            alpha: 0.2,
        };
        s.set_target(to);
        assert!(s.step(Duration::from_millis(1)));
        assert_eq!(s.pose(), to);
    }
}
