//! Rewriting a wrapped buffer into one contiguous run
//!
//! The first segment `[read, bound)` moves down to offset zero and the second
//! segment `[0, write)` follows it. Only the part of the second segment that
//! the move would overwrite is copied out first, and that part is bounded by
//! half the active bound, so scratch space never exceeds `bound / 2` bytes.

use super::reserve::Guard;
use super::{Extent, RingBuffer};
use crate::error::{Error, Result};
use tracing::debug;

impl RingBuffer {
    /// Make the stored data contiguous, starting at offset zero
    ///
    /// A buffer that is not wrapped is left untouched. Afterwards the read
    /// cursor is zero, the data is followed by a zero byte, and any pending
    /// grow has been applied.
    ///
    /// # Errors
    ///
    /// `Reserved` while a write reservation or a view is held,
    /// `OutOfMemory` if the scratch space cannot be allocated. The buffer is
    /// unchanged on error.
    pub fn make_contiguous(&mut self) -> Result<()> {
        if !self.is_wrapped() {
            return Ok(());
        }
        self.reservations.check(&[Guard::Write, Guard::View])?;

        let bound = self.active_bound();
        let first = bound - self.read;
        let second = self.write;
        let half = bound.div_ceil(2);

        // Head of the second segment that the first segment lands on
        let saved = second.min(half);
        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(saved)
            .map_err(|_| Error::OutOfMemory { requested: saved })?;
        scratch.extend_from_slice(&self.storage[..saved]);

        self.storage.copy_within(self.read..bound, 0);

        // The rest of the second segment sits past `half`, above where the
        // first segment landed, and only needs shifting up
        if second > half {
            self.storage.copy_within(half..second, first + half);
        }
        self.storage[first..first + saved].copy_from_slice(&scratch);

        let len = first + second;
        self.storage[len] = 0;
        self.read = 0;
        self.write = len;
        self.extent = Extent::Stable(self.capacity());

        debug!(first, second, scratch = saved, "buffer realigned");
        Ok(())
    }
}
