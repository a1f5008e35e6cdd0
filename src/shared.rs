//! Thread-shareable handle to a ring buffer
//!
//! [`RingBuffer`] is a single-owner structure. When ownership has to move
//! between threads, [`SharedRingBuffer`] puts it behind a mutex. Callers that
//! must not wait use [`try_with`](SharedRingBuffer::try_with), which gives up
//! immediately if another thread holds the buffer.

use crate::ring::RingBuffer;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a ring buffer shared between threads
#[derive(Debug, Clone)]
pub struct SharedRingBuffer {
    inner: Arc<Mutex<RingBuffer>>,
}

impl SharedRingBuffer {
    /// Wrap a buffer for sharing
    pub fn new(buffer: RingBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Run `f` with exclusive access, or return `None` if the buffer is busy
    pub fn try_with<R>(&self, f: impl FnOnce(&mut RingBuffer) -> R) -> Option<R> {
        let mut buffer = self.inner.try_lock()?;
        Some(f(&mut buffer))
    }

    /// Run `f` with exclusive access, waiting for other holders to finish
    pub fn with<R>(&self, f: impl FnOnce(&mut RingBuffer) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Unwrap the buffer if this is the last handle
    pub fn into_inner(self) -> Result<RingBuffer, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
