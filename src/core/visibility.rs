//! One-way visibility latches for gallery panels.
//!
//! A panel counts as seen once a given fraction of it has been inside the
//! viewport.  After that it stays seen; scrolling it back out does not
//! replay its entrance.

/// Default share of a panel that must be on screen.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Fraction of `[start, end)` that lies inside `[view_start, view_end)`.
pub fn visible_fraction(start: f64, end: f64, view_start: f64, view_end: f64) -> f64 {
    let len = end - start;
    if len <= 0.0 {
        return 0.0;
    }
    let overlap = end.min(view_end) - start.max(view_start);
    (overlap / len).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct VisibilityLatch {
    seen: Vec<bool>,
    threshold: f64,
}

impl VisibilityLatch {
    pub fn new(count: usize, threshold: f64) -> Self {
        Self {
            seen: vec![false; count],
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Feed the current position of panel `index`.  Returns `true` on the
    /// observation that latches it.
    pub fn observe(&mut self, index: usize, span: (f64, f64), view: (f64, f64)) -> bool {
        let Some(seen) = self.seen.get_mut(index) else {
            return false;
        };
        if *seen {
            return false;
        }
        let fraction = visible_fraction(span.0, span.1, view.0, view.1);
        // A zero threshold still needs the panel to touch the viewport.
        if fraction > 0.0 && fraction >= self.threshold {
            *seen = true;
            return true;
        }
        false
    }

    pub fn is_seen(&self, index: usize) -> bool {
        self.seen.get(index).copied().unwrap_or(false)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.iter().filter(|s| **s).count()
    }
}
