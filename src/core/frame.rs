//! Frame scheduling — "run this once before the next frame is drawn".
//!
//! Animations never own a timer.  They ask a [`FrameScheduler`] for a frame
//! and get back a [`FrameHandle`]; the event loop drains the handles that are
//! due at each frame boundary and routes them back to whoever asked.
//!
//! [`FrameClock`] is the terminal host's implementation.  It is
//! single-threaded by construction (`Rc<RefCell<_>>`): input handling and
//! frame stepping interleave on the one event-loop task, never concurrently.

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one requested frame.  Unique per clock, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_id(id: u64) -> Self {
        Self(id)
    }
}

/// Host capability: request a one-shot callback at the next frame boundary.
pub trait FrameScheduler {
    /// Request a frame.  The returned handle comes due exactly once unless
    /// cancelled first.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request.  Cancelling an unknown or already-fired handle is
    /// a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ClockInner {
    next_id: u64,
    /// Pending requests in request order.
    pending: Vec<FrameHandle>,
    frames: u64,
}

/// Shared frame clock.  Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while at least one frame has been requested and not yet fired.
    /// The event loop uses this to decide whether to tick at frame rate.
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Start a frame: drain and return every handle that is due.
    ///
    /// Requests made while the returned handles are being dispatched land in
    /// the *next* frame, never the current one.
    pub fn begin_frame(&self) -> Vec<FrameHandle> {
        let mut inner = self.inner.borrow_mut();
        inner.frames = inner.frames.wrapping_add(1);
        std::mem::take(&mut inner.pending)
    }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }
}

impl FrameScheduler for FrameClock {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id = inner.next_id.wrapping_add(1);
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.inner.borrow_mut().pending.retain(|h| *h != handle);
    }
}
