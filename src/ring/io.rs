//! Reading and writing
//!
//! Writes append at the write cursor, wrapping to the start of storage when
//! the read cursor has moved off zero, and never fill the separator slot just
//! before the read cursor. Reads consume from the read cursor. Both settle a
//! pending grow once the data is back in one segment.

use super::reserve::Guard;
use super::RingBuffer;
use crate::error::Result;
use tracing::trace;

impl RingBuffer {
    /// Append as many bytes of `data` as fit
    ///
    /// Input beyond the free space is dropped silently.
    ///
    /// # Arguments
    ///
    /// * `data` - Bytes to append
    ///
    /// # Returns
    ///
    /// The number of bytes actually written
    ///
    /// # Errors
    ///
    /// `Reserved` while a write reservation is held.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.reservations.check(&[Guard::Write])?;

        let mut written = 0;
        while written < data.len() {
            let avail = self.forward_available();
            if avail == 0 {
                break;
            }

            let count = avail.min(data.len() - written);
            let start = self.write;
            self.storage[start..start + count].copy_from_slice(&data[written..written + count]);
            written += count;

            self.write = start + count;
            if self.write == self.active_bound() {
                self.write = 0;
            }
        }
        self.storage[self.write] = 0;

        if written < data.len() {
            trace!(requested = data.len(), written, "write truncated");
        }

        self.settle();
        Ok(written)
    }

    /// Remove and return up to `size` bytes from the front
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum number of bytes to consume, `None` for everything
    ///
    /// # Returns
    ///
    /// The consumed bytes; fewer than requested when less is stored
    ///
    /// # Errors
    ///
    /// `Reserved` while a read reservation or a view is held.
    pub fn read(&mut self, size: Option<usize>) -> Result<Vec<u8>> {
        self.reservations.check(&[Guard::Read, Guard::View])?;

        let len = self.len();
        let count = size.map_or(len, |size| size.min(len));
        if count == 0 {
            return Ok(Vec::new());
        }

        let data = self.copy_range(0..count);

        self.read += count;
        let bound = self.active_bound();
        if self.read >= bound {
            self.read -= bound;
        }

        self.settle();
        Ok(data)
    }

    /// Remove and return everything stored
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.read(None)
    }
}
