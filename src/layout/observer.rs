//! # Size Observation
//!
//! [`SizeObserver`] wraps a child, lays it out exactly as the parent asked,
//! and reports the resulting size whenever it differs from the last one it
//! reported. Reports are never delivered during layout: they're queued on
//! a [`PostFrameCallbacks`] and run once the frame is over, so whoever
//! listens can mutate state and ask for a rebuild without re-entering the
//! layout that produced the size.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::{BoxConstraints, Layout, Size};

type Callback<T> = Box<dyn FnOnce(&mut T)>;

/// Callbacks that run after the current frame, in the order they were
/// scheduled, against the state they were scheduled for.
pub struct PostFrameCallbacks<T> {
    pending: Vec<Callback<T>>,
}

impl<T> Default for PostFrameCallbacks<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for PostFrameCallbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostFrameCallbacks")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<T> PostFrameCallbacks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, callback: impl FnOnce(&mut T) + 'static) {
        self.pending.push(Box::new(callback));
    }

    /// Run everything scheduled so far. Returns how many callbacks ran.
    ///
    /// Callbacks only receive the target, so anything they'd schedule
    /// belongs to the next frame.
    pub fn flush(&mut self, target: &mut T) -> usize {
        let batch = std::mem::take(&mut self.pending);
        let count = batch.len();
        for callback in batch {
            callback(target);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Reports a child's laid-out size whenever it changes.
pub struct SizeObserver<T> {
    last_reported: Option<Size>,
    on_change: Rc<dyn Fn(&mut T, Size)>,
}

impl<T> fmt::Debug for SizeObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizeObserver")
            .field("last_reported", &self.last_reported)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> SizeObserver<T> {
    pub fn new(on_change: impl Fn(&mut T, Size) + 'static) -> Self {
        Self {
            last_reported: None,
            on_change: Rc::new(on_change),
        }
    }

    /// Lay out `child` under `constraints` and return its size unchanged.
    /// Schedules `on_change` if the size differs from the last report.
    pub fn observe<L: Layout + ?Sized>(
        &mut self,
        child: &L,
        constraints: BoxConstraints,
        callbacks: &mut PostFrameCallbacks<T>,
    ) -> Size {
        let size = child.layout(constraints);
        if self.last_reported != Some(size) {
            trace!(?size, previous = ?self.last_reported, "observed size changed");
            self.last_reported = Some(size);
            let on_change = Rc::clone(&self.on_change);
            callbacks.schedule(move |target| on_change(target, size));
        }
        size
    }

    /// The size most recently scheduled for reporting.
    pub fn last_reported(&self) -> Option<Size> {
        self.last_reported
    }

    /// Forget the last report so the next observation reports again.
    pub fn reset(&mut self) {
        self.last_reported = None;
    }
}
