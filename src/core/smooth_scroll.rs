//! Pointer-driven smooth scroll with proportional ease-out.
//!
//! Wheel input moves a *target* offset immediately; the *current* offset
//! chases it one frame at a time, closing a fixed fraction of the remaining
//! distance per frame and snapping once it is within `epsilon`.  Input rate
//! and frame rate are decoupled: any number of wheel notches between two
//! frames collapse into a single net target.
//!
//! The controller owns exactly one outstanding frame request at a time and
//! gives it back on [`SmoothScroll::dispose`] (or drop), so a torn-down view
//! never gets written to.

use super::frame::{FrameHandle, FrameScheduler};

/// Current size of a scrollable viewport along its scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    /// Total length of the scrollable content.
    pub content: f64,
    /// Visible length of the viewport.
    pub viewport: f64,
}

impl Extents {
    pub fn new(content: f64, viewport: f64) -> Self {
        Self { content, viewport }
    }

    /// Largest valid offset.  Never negative, even when content fits.
    pub fn max_offset(&self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }
}

/// The element whose scroll position is being driven.
pub trait Viewport {
    /// Fresh extents, or `None` when the element isn't laid out yet.
    fn extents(&self) -> Option<Extents>;

    /// Write the scroll position.
    fn apply(&mut self, offset: f64);
}

/// Tunable constants of the ease.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTuning {
    /// Fraction of the remaining distance closed per frame, in `(0, 1)`.
    pub damping: f64,
    /// Convergence threshold in offset units.
    pub epsilon: f64,
}

impl ScrollTuning {
    pub const DEFAULT_DAMPING: f64 = 0.075;
    pub const DEFAULT_EPSILON: f64 = 0.5;

    pub fn new(damping: f64, epsilon: f64) -> Self {
        let damping = if damping.is_finite() {
            damping.clamp(0.01, 0.95)
        } else {
            Self::DEFAULT_DAMPING
        };
        let epsilon = if epsilon.is_finite() && epsilon > 0.0 {
            epsilon
        } else {
            Self::DEFAULT_EPSILON
        };
        Self { damping, epsilon }
    }
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAMPING, Self::DEFAULT_EPSILON)
    }
}

/// One wheel event.  Both axes are merged into the single logical offset,
/// so a vertical wheel drives a horizontal strip and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    default_prevented: bool,
}

impl WheelInput {
    pub fn new(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            default_prevented: false,
        }
    }

    /// Claim the event so the host skips its own scroll handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn merged(&self) -> f64 {
        self.delta_x + self.delta_y
    }
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Converged; no frame requested.
    Idle,
    /// Waiting for the given frame.
    Stepping(FrameHandle),
    /// Torn down.  Terminal.
    Disposed,
}

/// Smooth scroll controller for one view.
#[derive(Debug)]
pub struct SmoothScroll<S: FrameScheduler, V: Viewport> {
    current: f64,
    target: f64,
    tuning: ScrollTuning,
    phase: LoopPhase,
    scheduler: S,
    viewport: V,
}

impl<S: FrameScheduler, V: Viewport> SmoothScroll<S, V> {
    pub fn new(scheduler: S, viewport: V, tuning: ScrollTuning) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            tuning,
            phase: LoopPhase::Idle,
            scheduler,
            viewport,
        }
    }

    // ── input sampler ──────────────────────────────────────────

    /// Fold a wheel event into the target.
    ///
    /// No-op (event left unclaimed) when the viewport has no extents yet or
    /// the controller is disposed.
    pub fn on_wheel_input(&mut self, input: &mut WheelInput) {
        if self.is_disposed() {
            return;
        }
        let Some(extents) = self.viewport.extents() else {
            return;
        };
        input.prevent_default();
        self.retarget(self.target + input.merged(), extents);
    }

    /// Nudge the target by `delta` (keyboard scrolling).
    pub fn scroll_by(&mut self, delta: f64) {
        if self.is_disposed() {
            return;
        }
        if let Some(extents) = self.viewport.extents() {
            self.retarget(self.target + delta, extents);
        }
    }

    /// Ease toward an absolute offset.
    pub fn scroll_to(&mut self, offset: f64) {
        if self.is_disposed() {
            return;
        }
        if let Some(extents) = self.viewport.extents() {
            self.retarget(offset, extents);
        }
    }

    /// Move to `offset` immediately, without easing.
    pub fn jump_to(&mut self, offset: f64) {
        if self.is_disposed() {
            return;
        }
        let Some(extents) = self.viewport.extents() else {
            return;
        };
        let offset = clamp_offset(offset, extents.max_offset());
        self.cancel_pending();
        self.target = offset;
        self.current = offset;
        self.viewport.apply(offset);
    }

    fn retarget(&mut self, raw: f64, extents: Extents) {
        let max = extents.max_offset();
        self.target = clamp_offset(raw, max);
        // Content may have shrunk since `current` was applied.
        if self.current > max {
            self.current = max;
            self.viewport.apply(max);
        }
        if self.target != self.current {
            self.ensure_scheduled();
        }
    }

    // ── easing stepper ────────────────────────────────────────

    /// Advance one frame toward the target.  Returns `true` once converged.
    pub fn step(&mut self) -> bool {
        self.current += (self.target - self.current) * self.tuning.damping;
        let converged = (self.target - self.current).abs() <= self.tuning.epsilon;
        if converged {
            self.current = self.target;
        }
        self.viewport.apply(self.current);
        converged
    }

    // ── loop controller ───────────────────────────────────────

    /// Frame callback.  Handles this controller isn't waiting on are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.phase != LoopPhase::Stepping(handle) {
            return;
        }
        if self.step() {
            tracing::trace!(frame = handle.id(), offset = self.current, "scroll settled");
            self.phase = LoopPhase::Idle;
        } else {
            self.phase = LoopPhase::Stepping(self.scheduler.request_frame());
        }
    }

    fn ensure_scheduled(&mut self) {
        if self.phase == LoopPhase::Idle {
            self.phase = LoopPhase::Stepping(self.scheduler.request_frame());
        }
    }

    fn cancel_pending(&mut self) {
        if let LoopPhase::Stepping(handle) = self.phase {
            self.scheduler.cancel_frame(handle);
            self.phase = LoopPhase::Idle;
        }
    }

    /// Cancel any pending frame and stop for good.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.cancel_pending();
        self.phase = LoopPhase::Disposed;
        tracing::trace!(offset = self.current, "smooth scroll disposed");
    }

    // ── accessors ─────────────────────────────────────────────

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, LoopPhase::Stepping(_))
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == LoopPhase::Disposed
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access for the host to refresh layout (extents).
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}

impl<S: FrameScheduler, V: Viewport> Drop for SmoothScroll<S, V> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn clamp_offset(offset: f64, max: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::FrameClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Scheduler that records every request and cancellation.
    #[derive(Debug, Clone, Default)]
    struct RecordingScheduler {
        log: Rc<RefCell<SchedLog>>,
    }

    #[derive(Debug, Default)]
    struct SchedLog {
        next: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for RecordingScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            let mut log = self.log.borrow_mut();
            log.next += 1;
            let handle = FrameHandle::from_id(log.next);
            log.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.log.borrow_mut().cancelled.push(handle);
        }
    }

    #[derive(Debug, Clone, Default)]
    struct FakeViewport {
        extents: Option<Extents>,
        applied: Rc<RefCell<Vec<f64>>>,
    }

    impl FakeViewport {
        fn sized(content: f64, viewport: f64) -> Self {
            Self {
                extents: Some(Extents::new(content, viewport)),
                applied: Rc::default(),
            }
        }
    }

    impl Viewport for FakeViewport {
        fn extents(&self) -> Option<Extents> {
            self.extents
        }

        fn apply(&mut self, offset: f64) {
            self.applied.borrow_mut().push(offset);
        }
    }

    fn controller(max: f64) -> SmoothScroll<FrameClock, FakeViewport> {
        SmoothScroll::new(
            FrameClock::new(),
            FakeViewport::sized(max + 100.0, 100.0),
            ScrollTuning::default(),
        )
    }

    /// Drive frames until idle; returns the number of frames run.
    fn run_to_idle(sc: &mut SmoothScroll<FrameClock, FakeViewport>, clock: &FrameClock) -> usize {
        let mut frames = 0;
        while sc.is_animating() {
            for h in clock.begin_frame() {
                sc.on_frame(h);
            }
            frames += 1;
            assert!(frames < 10_000, "loop never converged");
        }
        frames
    }

    #[test]
    fn wheel_clamps_to_max_offset() {
        // Scenario A.
        let mut sc = controller(1000.0);
        let mut input = WheelInput::new(0.0, 1500.0);
        sc.on_wheel_input(&mut input);
        assert_eq!(sc.target(), 1000.0);
        assert!(input.default_prevented());
    }

    #[test]
    fn wheel_clamps_to_zero() {
        let mut sc = controller(1000.0);
        sc.on_wheel_input(&mut WheelInput::new(-400.0, -1e9));
        assert_eq!(sc.target(), 0.0);
        assert_eq!(sc.phase(), LoopPhase::Idle);
    }

    #[test]
    fn offsets_stay_in_bounds_for_wild_input() {
        let clock = FrameClock::new();
        let mut sc = SmoothScroll::new(
            clock.clone(),
            FakeViewport::sized(600.0, 100.0),
            ScrollTuning::default(),
        );
        for d in [1e12, -3.0, f64::MAX, -f64::MAX, 250.0, -1e-9, 77.7] {
            sc.on_wheel_input(&mut WheelInput::new(d, d / 2.0));
            assert!((0.0..=500.0).contains(&sc.target()));
            assert!((0.0..=500.0).contains(&sc.current()));
            for h in clock.begin_frame() {
                sc.on_frame(h);
            }
            assert!((0.0..=500.0).contains(&sc.current()));
        }
    }

    #[test]
    fn first_step_moves_by_damping_then_snaps() {
        // Scenario B.
        let clock = FrameClock::new();
        let mut sc = SmoothScroll::new(
            clock.clone(),
            FakeViewport::sized(1100.0, 100.0),
            ScrollTuning::default(),
        );
        sc.on_wheel_input(&mut WheelInput::new(0.0, 100.0));
        for h in clock.begin_frame() {
            sc.on_frame(h);
        }
        assert!((sc.current() - 7.5).abs() < 1e-9);

        run_to_idle(&mut sc, &clock);
        assert_eq!(sc.current(), 100.0);
        assert_eq!(sc.phase(), LoopPhase::Idle);
        assert!(!clock.has_pending());
    }

    #[test]
    fn converges_exactly_after_any_input_sequence() {
        let clock = FrameClock::new();
        let mut sc = SmoothScroll::new(
            clock.clone(),
            FakeViewport::sized(5000.0, 400.0),
            ScrollTuning::default(),
        );
        let deltas = [120.0, -30.0, 900.0, 15.5, -2000.0, 3333.3, 42.0];
        for (i, d) in deltas.iter().enumerate() {
            sc.on_wheel_input(&mut WheelInput::new(*d * 0.25, *d * 0.75));
            // Interleave a few frames between some events.
            for _ in 0..(i % 3) {
                for h in clock.begin_frame() {
                    sc.on_frame(h);
                }
            }
        }
        run_to_idle(&mut sc, &clock);
        assert_eq!(sc.current(), sc.target());
    }

    #[test]
    fn error_shrinks_monotonically() {
        let mut sc = controller(1000.0);
        sc.on_wheel_input(&mut WheelInput::new(0.0, 800.0));
        let mut prev = (sc.target() - sc.current()).abs();
        loop {
            let converged = sc.step();
            let err = (sc.target() - sc.current()).abs();
            assert!(err <= prev);
            if converged {
                assert_eq!(err, 0.0);
                break;
            }
            assert!(err < prev, "error must strictly drop above epsilon");
            prev = err;
        }
    }

    #[test]
    fn step_when_converged_is_idempotent() {
        let mut sc = controller(1000.0);
        assert!(sc.step());
        assert_eq!(sc.current(), 0.0);
        sc.jump_to(250.0);
        assert!(sc.step());
        assert!(sc.step());
        assert_eq!(sc.current(), 250.0);
    }

    #[test]
    fn dispose_while_stepping_cancels_frame() {
        // Scenario C.
        let sched = RecordingScheduler::default();
        let vp = FakeViewport::sized(1100.0, 100.0);
        let applied = vp.applied.clone();
        let mut sc = SmoothScroll::new(sched.clone(), vp, ScrollTuning::default());

        sc.on_wheel_input(&mut WheelInput::new(0.0, 300.0));
        let LoopPhase::Stepping(pending) = sc.phase() else {
            panic!("expected a scheduled frame");
        };
        sc.dispose();

        assert_eq!(sched.log.borrow().cancelled, vec![pending]);
        assert!(sc.is_disposed());

        // The stale callback fires anyway; nothing may be written.
        sc.on_frame(pending);
        sc.on_wheel_input(&mut WheelInput::new(0.0, 10.0));
        sc.scroll_to(50.0);
        assert!(applied.borrow().is_empty());
        assert_eq!(sched.log.borrow().requested.len(), 1);
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let clock = FrameClock::new();
        {
            let mut sc = SmoothScroll::new(
                clock.clone(),
                FakeViewport::sized(1100.0, 100.0),
                ScrollTuning::default(),
            );
            sc.on_wheel_input(&mut WheelInput::new(0.0, 300.0));
            assert!(clock.has_pending());
        }
        assert!(!clock.has_pending());
    }

    #[test]
    fn rapid_inputs_collapse_into_one_target() {
        // Scenario D.
        let sched = RecordingScheduler::default();
        let mut sc = SmoothScroll::new(
            sched.clone(),
            FakeViewport::sized(1100.0, 100.0),
            ScrollTuning::default(),
        );
        sc.on_wheel_input(&mut WheelInput::new(0.0, 50.0));
        sc.on_wheel_input(&mut WheelInput::new(0.0, -20.0));
        assert_eq!(sc.target(), 30.0);
        assert_eq!(sched.log.borrow().requested.len(), 1);

        let LoopPhase::Stepping(h) = sc.phase() else {
            panic!("expected a scheduled frame");
        };
        sc.on_frame(h);
        assert!((sc.current() - 30.0 * 0.075).abs() < 1e-9);
    }

    #[test]
    fn missing_extents_is_a_no_op() {
        let clock = FrameClock::new();
        let mut sc = SmoothScroll::new(clock.clone(), FakeViewport::default(), ScrollTuning::default());
        let mut input = WheelInput::new(0.0, 100.0);
        sc.on_wheel_input(&mut input);
        assert!(!input.default_prevented());
        assert_eq!(sc.target(), 0.0);
        assert!(!clock.has_pending());
    }

    #[test]
    fn foreign_frame_handles_are_ignored() {
        let mut clock = FrameClock::new();
        let stranger = clock.request_frame();
        let mut sc = SmoothScroll::new(
            clock.clone(),
            FakeViewport::sized(1100.0, 100.0),
            ScrollTuning::default(),
        );
        sc.on_wheel_input(&mut WheelInput::new(40.0, 0.0));
        sc.on_frame(stranger);
        assert_eq!(sc.current(), 0.0);
    }

    #[test]
    fn max_offset_is_requeried_per_event() {
        let clock = FrameClock::new();
        let mut sc = SmoothScroll::new(
            clock.clone(),
            FakeViewport::sized(300.0, 100.0),
            ScrollTuning::default(),
        );
        sc.on_wheel_input(&mut WheelInput::new(0.0, 1000.0));
        assert_eq!(sc.target(), 200.0);

        sc.viewport_mut().extents = Some(Extents::new(900.0, 100.0));
        sc.on_wheel_input(&mut WheelInput::new(0.0, 1000.0));
        assert_eq!(sc.target(), 800.0);
    }

    #[test]
    fn shrinking_content_reclamps_current() {
        let clock = FrameClock::new();
        let vp = FakeViewport::sized(1100.0, 100.0);
        let applied = vp.applied.clone();
        let mut sc = SmoothScroll::new(clock.clone(), vp, ScrollTuning::default());
        sc.jump_to(900.0);

        sc.viewport_mut().extents = Some(Extents::new(400.0, 100.0));
        sc.scroll_to(sc.target());
        assert_eq!(sc.target(), 300.0);
        assert_eq!(sc.current(), 300.0);
        assert_eq!(applied.borrow().last().copied(), Some(300.0));
        assert!(!sc.is_animating());
    }

    #[test]
    fn jump_applies_immediately_and_cancels() {
        let clock = FrameClock::new();
        let vp = FakeViewport::sized(1100.0, 100.0);
        let applied = vp.applied.clone();
        let mut sc = SmoothScroll::new(clock.clone(), vp, ScrollTuning::default());
        sc.on_wheel_input(&mut WheelInput::new(0.0, 500.0));
        sc.jump_to(2000.0);
        assert_eq!(sc.current(), 1000.0);
        assert_eq!(sc.target(), 1000.0);
        assert_eq!(applied.borrow().last().copied(), Some(1000.0));
        assert!(!clock.has_pending());
    }

    #[test]
    fn tuning_clamps_bad_values() {
        let t = ScrollTuning::new(3.0, -1.0);
        assert_eq!(t.damping, 0.95);
        assert_eq!(t.epsilon, ScrollTuning::DEFAULT_EPSILON);
        let t = ScrollTuning::new(f64::NAN, 0.25);
        assert_eq!(t.damping, ScrollTuning::DEFAULT_DAMPING);
        assert_eq!(t.epsilon, 0.25);
    }

    #[test]
    fn max_offset_floors_at_zero() {
        assert_eq!(Extents::new(50.0, 100.0).max_offset(), 0.0);
        assert_eq!(Extents::new(150.0, 100.0).max_offset(), 50.0);
    }
}
