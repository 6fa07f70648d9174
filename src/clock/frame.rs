//! Cooperative frame scheduling.
//!
//! The clock asks for one frame at a time and keeps the returned
//! [`FrameHandle`]. Stopping the clock revokes the handle, and a frame
//! delivered for a handle that is no longer pending is ignored by the driver.

use std::sync::{Arc, Mutex};

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Returns the raw handle id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host facility that delivers frame callbacks.
pub trait FrameScheduler: Send {
    /// Requests a callback on the next available frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Revokes a previously requested callback.
    ///
    /// Cancelling a handle that was already delivered or cancelled is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueueInner {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

/// Frame scheduler backed by a shared queue.
///
/// The clock holds one clone and requests frames; the host holds another and
/// drains ready frames once per tick with [`FrameQueue::take_ready`].
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    inner: Arc<Mutex<FrameQueueInner>>,
}

impl FrameQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every frame requested since the last call.
    ///
    /// Frames requested while handling the returned ones go to the next call.
    pub fn take_ready(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.lock().pending)
    }

    /// Number of frames waiting to be delivered.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FrameQueueInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.lock().pending.retain(|pending| *pending != handle);
    }
}
