//! Reservation counters and zero-copy views
//!
//! Three independent counters record scopes that are open across calls:
//!
//! - `read`: consuming reads and searches are refused
//! - `write`: writes, realignment and clearing are refused
//! - `view`: a zero-copy view is outstanding; reads, realignment, clearing,
//!   in-place stores and growth are refused
//!
//! Nothing ever waits on a counter. A conflicting operation fails at once with
//! [`Error::Reserved`] and can be retried after the scope is released.
//!
//! Writes stay permitted while a view is held. Acquiring a view makes the data
//! contiguous first, and writes never cross the separator slot before the
//! read cursor, so the viewed range is never touched.

use super::RingBuffer;
use crate::error::{Error, Result};
use std::fmt;
use std::ops::Deref;
use tracing::{trace, warn};

/// Kind of reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Forbids consuming reads and searches
    Read,
    /// Forbids writes and structural changes
    Write,
    /// A zero-copy view of the contents is outstanding
    View,
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Guard::Read => "read",
            Guard::Write => "write",
            Guard::View => "view",
        })
    }
}

/// Snapshot of the outstanding reservation counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reservations {
    /// Outstanding read reservations
    pub read: usize,
    /// Outstanding write reservations
    pub write: usize,
    /// Outstanding views
    pub view: usize,
}

impl Reservations {
    /// Counter for one kind of reservation
    pub fn count(&self, guard: Guard) -> usize {
        match guard {
            Guard::Read => self.read,
            Guard::Write => self.write,
            Guard::View => self.view,
        }
    }

    /// Whether no reservation of any kind is outstanding
    pub fn is_clear(&self) -> bool {
        self.read == 0 && self.write == 0 && self.view == 0
    }

    /// Fail with `Reserved` on the first listed guard that is held
    pub(crate) fn check(&self, guards: &[Guard]) -> Result<()> {
        match guards.iter().find(|&&guard| self.count(guard) > 0) {
            Some(&guard) => Err(Error::Reserved(guard)),
            None => Ok(()),
        }
    }

    pub(crate) fn acquire(&mut self, guard: Guard) {
        *self.slot(guard) += 1;
    }

    /// Decrement a counter; `false` if it was already zero
    pub(crate) fn release(&mut self, guard: Guard) -> bool {
        let slot = self.slot(guard);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    fn slot(&mut self, guard: Guard) -> &mut usize {
        match guard {
            Guard::Read => &mut self.read,
            Guard::Write => &mut self.write,
            Guard::View => &mut self.view,
        }
    }
}

impl RingBuffer {
    /// Current reservation counters
    pub fn reservations(&self) -> Reservations {
        self.reservations
    }

    /// Open a reservation scope
    ///
    /// Every call must be paired with [`release`](RingBuffer::release).
    /// Reserving [`Guard::View`] realigns the data first, exactly like
    /// [`acquire_view`](RingBuffer::acquire_view).
    ///
    /// # Errors
    ///
    /// Only a view reservation can fail, with the errors of
    /// [`make_contiguous`](RingBuffer::make_contiguous).
    pub fn reserve(&mut self, guard: Guard) -> Result<()> {
        if guard == Guard::View {
            self.make_contiguous()?;
        }
        self.reservations.acquire(guard);
        trace!(%guard, "reservation acquired");
        Ok(())
    }

    /// Close a reservation scope opened with [`reserve`](RingBuffer::reserve)
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if no reservation of that kind is outstanding.
    pub fn release(&mut self, guard: Guard) -> Result<()> {
        if !self.reservations.release(guard) {
            warn!(%guard, "release without a matching reservation");
            return Err(Error::InvalidArgument("no matching reservation to release"));
        }
        trace!(%guard, "reservation released");
        Ok(())
    }

    /// Borrow the contents as one contiguous slice
    ///
    /// The data is realigned first if it is wrapped. The view reservation is
    /// released when the returned [`View`] is dropped, on every exit path.
    pub fn view(&mut self) -> Result<View<'_>> {
        self.reserve(Guard::View)?;
        Ok(View { buffer: self })
    }

    /// Export the contents as a raw pointer and length
    ///
    /// For callers that cannot hold a [`View`] borrow. The data is realigned
    /// first if it is wrapped, and the view reservation stays held until
    /// [`release_view`](RingBuffer::release_view) is called. While it is held
    /// the exported bytes are neither moved nor modified by this buffer.
    pub fn acquire_view(&mut self) -> Result<RawView> {
        self.reserve(Guard::View)?;
        Ok(RawView {
            ptr: self.storage[self.read..].as_ptr(),
            len: self.len(),
        })
    }

    /// Release a view exported by [`acquire_view`](RingBuffer::acquire_view)
    pub fn release_view(&mut self) -> Result<()> {
        self.release(Guard::View)
    }

    /// Contiguous stored data; only meaningful while a view is held
    fn contiguous(&self) -> &[u8] {
        debug_assert!(!self.is_wrapped());
        &self.storage[self.read..self.read + self.len()]
    }
}

/// Scoped zero-copy view of a ring buffer's contents
///
/// Dereferences to the stored bytes in logical order.
#[derive(Debug)]
pub struct View<'a> {
    buffer: &'a mut RingBuffer,
}

impl View<'_> {
    /// The viewed bytes followed by the zero guard byte
    pub fn with_nul(&self) -> &[u8] {
        let start = self.buffer.read;
        &self.buffer.storage[start..=start + self.buffer.len()]
    }
}

impl Deref for View<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.contiguous()
    }
}

impl AsRef<[u8]> for View<'_> {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl Drop for View<'_> {
    fn drop(&mut self) {
        self.buffer.reservations.release(Guard::View);
    }
}

/// Raw pointer and length of an exported view
#[derive(Debug, Clone, Copy)]
pub struct RawView {
    ptr: *const u8,
    len: usize,
}

impl RawView {
    /// Pointer to the first viewed byte
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /// Number of viewed bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The viewed bytes
    ///
    /// # Safety
    ///
    /// The view must not have been released and the buffer it came from must
    /// still be alive, and the returned slice must not outlive either.
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        // SAFETY: the caller guarantees the view is still held, so the buffer
        // has neither moved nor modified these bytes.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}
