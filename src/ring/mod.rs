//! Growable circular byte buffer
//!
//! This module holds the [`RingBuffer`] type and the pieces that operate on
//! it. The responsibilities are split by file:
//!
//! - `geometry`: pure index arithmetic over the cursors
//! - `io`: reading and writing, which move the cursors
//! - `search`: substring search across the wrap boundary
//! - `realign`: rewriting a wrapped buffer into one contiguous run
//! - `reserve`: reservation counters and zero-copy views
//!
//! Storage holds `capacity + 2` bytes. The ring itself occupies the first
//! `active_bound` slots; one slot is always left free between the write and
//! read cursors so that equal cursors can only mean "empty". The free slot at
//! the write cursor is kept zero, which makes realigned content NUL terminated.

pub mod geometry;
pub mod io;
pub mod realign;
pub mod reserve;
pub mod search;

use crate::config::RingBufferConfig;
use crate::error::{Error, Result};
use reserve::{Guard, Reservations};
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Bytes allocated past the ring slots
const GUARD_BYTES: usize = 2;

/// Bound governing the wrap arithmetic
///
/// A grow requested while the data is wrapped cannot take effect until the
/// data is back in one segment, otherwise the modular arithmetic used to
/// locate the second segment would change under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extent {
    /// The allocated capacity is the active bound
    Stable(usize),
    /// A grow has been allocated but the old bound is still in effect
    PendingGrow {
        /// Bound used for wrap arithmetic
        active: usize,
        /// Capacity to apply once the buffer is no longer wrapped
        requested: usize,
    },
}

impl Extent {
    /// Bound used for wrap arithmetic
    pub(crate) fn active(self) -> usize {
        match self {
            Extent::Stable(bound) => bound,
            Extent::PendingGrow { active, .. } => active,
        }
    }

    /// Latest requested capacity
    pub(crate) fn capacity(self) -> usize {
        match self {
            Extent::Stable(bound) => bound,
            Extent::PendingGrow { requested, .. } => requested,
        }
    }
}

/// Single-owner circular byte buffer
///
/// Bytes are appended with [`write`](RingBuffer::write) and consumed from the
/// front with [`read`](RingBuffer::read). Stored data may wrap around the end
/// of the backing storage; [`make_contiguous`](RingBuffer::make_contiguous)
/// and [`view`](RingBuffer::view) rewrite it into a single run.
pub struct RingBuffer {
    /// Backing storage, `capacity + 2` bytes
    storage: Vec<u8>,
    /// Active bound and pending grow state
    extent: Extent,
    /// Physical position of the first stored byte
    read: usize,
    /// Physical position one past the last stored byte
    write: usize,
    /// Outstanding reservation counters
    reservations: Reservations,
    /// Maximum length of the rendered preview
    preview_len: usize,
}

impl RingBuffer {
    /// Create a new buffer with the given capacity
    ///
    /// One slot is kept free, so `capacity - 1` bytes can be stored.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero capacity, `OutOfMemory` if the storage
    /// cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(RingBufferConfig::with_capacity(capacity))
    }

    /// Create a new buffer from a configuration
    pub fn with_config(config: RingBufferConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be greater than zero"));
        }

        let total = storage_size(config.capacity)?;
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(total)
            .map_err(|_| Error::OutOfMemory { requested: total })?;
        storage.resize(total, 0);

        Ok(Self {
            storage,
            extent: Extent::Stable(config.capacity),
            read: 0,
            write: 0,
            reservations: Reservations::default(),
            preview_len: config.preview_len,
        })
    }

    /// Latest requested capacity
    ///
    /// May exceed [`active_bound`](RingBuffer::active_bound) while a grow is
    /// waiting for the buffer to unwrap.
    pub fn capacity(&self) -> usize {
        self.extent.capacity()
    }

    /// Whether a grow has been allocated but not yet applied
    pub fn is_grow_pending(&self) -> bool {
        matches!(self.extent, Extent::PendingGrow { .. })
    }

    /// Grow the buffer to `new_capacity`
    ///
    /// Shrinking is not supported; a smaller or equal capacity is a no-op.
    /// If the data is currently wrapped, the storage is grown at once but the
    /// new bound only takes effect once the buffer is back in one segment.
    ///
    /// # Arguments
    ///
    /// * `new_capacity` - Requested capacity, counting the separator slot
    ///
    /// # Returns
    ///
    /// The capacity in effect after the call
    ///
    /// # Errors
    ///
    /// `Reserved` while a view is outstanding, since growing may move the
    /// storage. `OutOfMemory` if the storage cannot be grown; the buffer is
    /// left unchanged.
    pub fn resize(&mut self, new_capacity: usize) -> Result<usize> {
        let capacity = self.capacity();
        if new_capacity <= capacity {
            return Ok(capacity);
        }
        self.reservations.check(&[Guard::View])?;

        let total = storage_size(new_capacity)?;
        self.storage
            .try_reserve_exact(total - self.storage.len())
            .map_err(|_| Error::OutOfMemory { requested: total })?;
        self.storage.resize(total, 0);

        let active = self.extent.active();
        self.extent = Extent::PendingGrow {
            active,
            requested: new_capacity,
        };
        debug!(active, requested = new_capacity, "resize requested");

        self.settle();
        Ok(new_capacity)
    }

    /// Drop all stored data
    ///
    /// Any pending grow is applied.
    ///
    /// # Errors
    ///
    /// `Reserved` if any reservation is outstanding.
    pub fn clear(&mut self) -> Result<()> {
        self.reservations
            .check(&[Guard::Read, Guard::Write, Guard::View])?;

        self.read = 0;
        self.write = 0;
        self.storage[0] = 0;
        self.extent = Extent::Stable(self.capacity());
        Ok(())
    }

    /// Byte at a logical index; negative indices count from the end
    pub fn get(&self, index: isize) -> Result<u8> {
        let pos = self.checked_physical(index)?;
        Ok(self.storage[pos])
    }

    /// Overwrite the byte at a logical index; negative indices count from the end
    ///
    /// # Errors
    ///
    /// `Reserved` while a view is outstanding, `IndexError` if the index is
    /// outside the stored data.
    pub fn set(&mut self, index: isize, byte: u8) -> Result<()> {
        self.reservations.check(&[Guard::View])?;
        let pos = self.checked_physical(index)?;
        self.storage[pos] = byte;
        Ok(())
    }

    /// Copy of the bytes in a slice-notation range
    ///
    /// Uses the same normalization as the search methods; an empty or
    /// out-of-range selection yields an empty vector.
    ///
    /// # Arguments
    ///
    /// * `start` - First logical index; negative counts from the end
    /// * `end` - Index one past the last byte; `-1` means through the last byte
    ///
    /// # Returns
    ///
    /// The selected bytes in logical order
    pub fn slice(&self, start: isize, end: isize) -> Vec<u8> {
        match geometry::normalize_slice(self.len(), start, end) {
            Some(range) => self.copy_range(range),
            None => Vec::new(),
        }
    }

    /// Copy of every `step`-th byte of a range, walking backwards for a
    /// negative step
    ///
    /// Bounds follow the usual sequence slicing rules: negative bounds count
    /// from the end and are then clamped to the stored data. An omitted
    /// `start` or `end` means the first or last byte in walking order.
    ///
    /// # Arguments
    ///
    /// * `start` - Logical index of the first byte taken
    /// * `end` - Logical index at which the walk stops, exclusive
    /// * `step` - Distance between taken bytes, may be negative
    ///
    /// # Returns
    ///
    /// The taken bytes in walking order
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero step.
    pub fn slice_step(
        &self,
        start: Option<isize>,
        end: Option<isize>,
        step: isize,
    ) -> Result<Vec<u8>> {
        if step == 0 {
            return Err(Error::InvalidArgument("slice step cannot be zero"));
        }

        let len = self.len() as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: isize| {
            let bound = if bound < 0 { bound + len } else { bound };
            bound.clamp(lower, upper)
        };
        let start = start.map_or(if step > 0 { lower } else { upper }, clamp);
        let end = end.map_or(if step > 0 { upper } else { lower }, clamp);

        let count = match step > 0 {
            true if start < end => (end - start - 1) / step + 1,
            false if end < start => (end - start + 1) / step + 1,
            _ => 0,
        };

        Ok((0..count)
            .map(|i| self.storage[self.physical((start + i * step) as usize)])
            .collect())
    }

    /// Copy of all stored bytes, in logical order
    pub fn to_vec(&self) -> Vec<u8> {
        self.copy_range(0..self.len())
    }

    /// Bounded-length rendering of the buffer
    ///
    /// The rendering is `<RingBuffer[len]:content>` with non-printable bytes
    /// escaped as in byte string literals. When it would reach the configured
    /// preview length, it is cut short and ends in `..>` at exactly that
    /// length. It is never longer than the preview length.
    pub fn preview(&self) -> String {
        let len = self.len();
        let mut out = format!("<RingBuffer[{len}]:");

        // Every byte escapes to at least one character
        let shown = self.copy_range(0..len.min(self.preview_len));
        out.extend(shown.escape_ascii().map(char::from));

        if shown.len() == len && out.len() + 1 < self.preview_len {
            out.push('>');
            return out;
        }

        out.truncate(self.preview_len.saturating_sub(3));
        out.push_str("..>");
        out.truncate(self.preview_len);
        out
    }

    /// Physical index of a logical index, validated against the stored length
    fn checked_physical(&self, index: isize) -> Result<usize> {
        let len = self.len();
        let out_of_range = Error::IndexError { index, len };

        let adjusted = if index < 0 {
            index + len as isize
        } else {
            index
        };
        if adjusted < 0 || adjusted as usize >= len {
            return Err(out_of_range);
        }

        self.translate(adjusted).ok_or(out_of_range)
    }

    /// Copy a logical range out of the ring
    pub(crate) fn copy_range(&self, range: Range<usize>) -> Vec<u8> {
        let (head, tail) = self.range_slices(range);
        let mut out = Vec::with_capacity(head.len() + tail.len());
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        out
    }

    /// Apply a pending grow if the data is in one segment
    pub(crate) fn settle(&mut self) {
        if let Extent::PendingGrow { active, requested } = self.extent {
            if !self.is_wrapped() {
                self.extent = Extent::Stable(requested);
                debug!(from = active, to = requested, "deferred grow applied");
            }
        }
    }
}

/// Storage size for a capacity, guard bytes included
fn storage_size(capacity: usize) -> Result<usize> {
    capacity
        .checked_add(GUARD_BYTES)
        .filter(|&total| total <= isize::MAX as usize)
        .ok_or(Error::OutOfMemory {
            requested: capacity,
        })
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_vec()))
    }
}
