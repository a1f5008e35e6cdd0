//! Index arithmetic over the ring cursors
//!
//! Nothing here mutates the buffer. Physical positions index the backing
//! storage; logical positions are offsets from the read cursor.

use super::RingBuffer;
use std::ops::Range;

impl RingBuffer {
    /// Bound currently governing the wrap arithmetic
    pub fn active_bound(&self) -> usize {
        self.extent.active()
    }

    /// Whether stored data occupies two physical segments
    pub fn is_wrapped(&self) -> bool {
        self.write < self.read
    }

    /// Length of the contiguous run of stored data starting at physical `start`
    pub fn forward_length(&self, start: usize) -> usize {
        if self.write >= start {
            self.write - start
        } else {
            self.active_bound() - start
        }
    }

    /// Number of stored bytes
    pub fn total_length(&self) -> usize {
        let mut len = self.forward_length(self.read);
        if self.is_wrapped() {
            len += self.forward_length(0);
        }
        len
    }

    /// Number of stored bytes
    pub fn len(&self) -> usize {
        self.total_length()
    }

    /// Whether the buffer holds no data
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// Free space writable at the write cursor without wrapping
    pub fn forward_available(&self) -> usize {
        if self.is_wrapped() {
            self.read - self.write - 1
        } else if self.read == 0 {
            self.active_bound() - self.write - 1
        } else {
            self.active_bound() - self.write
        }
    }

    /// Total free space, excluding the separator slot
    pub fn total_available(&self) -> usize {
        self.active_bound() - 1 - self.total_length()
    }

    /// Number of bytes a [`write`](RingBuffer::write) can currently accept
    pub fn write_available(&self) -> usize {
        self.total_available()
    }

    /// Physical index of a logical position
    ///
    /// Position `len()` is accepted and maps to the write cursor, so the
    /// result can serve as an exclusive range end. Returns `None` for negative
    /// positions and positions past the end of the data.
    pub fn translate(&self, pos: isize) -> Option<usize> {
        if pos < 0 || pos as usize > self.total_length() {
            return None;
        }
        Some(self.physical(pos as usize))
    }

    /// Stored data as two slices, in logical order
    ///
    /// The second slice is empty unless the buffer is wrapped.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        self.range_slices(0..self.total_length())
    }

    /// Physical index of an in-range logical position
    pub(crate) fn physical(&self, logical: usize) -> usize {
        let bound = self.active_bound();
        let pos = self.read + logical;
        if pos >= bound {
            pos - bound
        } else {
            pos
        }
    }

    /// A logical range as at most two physical slices
    pub(crate) fn range_slices(&self, range: Range<usize>) -> (&[u8], &[u8]) {
        debug_assert!(range.end <= self.total_length());

        let count = range.end.saturating_sub(range.start);
        if count == 0 {
            return (&[], &[]);
        }

        let start = self.physical(range.start);
        let forward = self.forward_length(start);
        if count <= forward {
            (&self.storage[start..start + count], &[])
        } else {
            (
                &self.storage[start..start + forward],
                &self.storage[..count - forward],
            )
        }
    }
}

/// Normalize slice-notation bounds against a length
///
/// A negative `start` counts back from `len`. A negative `end` counts back
/// from one past `len`, so `-1` selects through the last byte. `end` is
/// clamped to `len`. Returns `None` when the selection is empty.
pub fn normalize_slice(len: usize, start: isize, end: isize) -> Option<Range<usize>> {
    let len = isize::try_from(len).unwrap_or(isize::MAX);

    let start = if start < 0 {
        start.saturating_add(len)
    } else {
        start
    };
    let end = if end < 0 {
        end.saturating_add(len).saturating_add(1)
    } else {
        end.min(len)
    };

    if start < 0 || end <= start {
        return None;
    }
    Some(start as usize..end as usize)
}
