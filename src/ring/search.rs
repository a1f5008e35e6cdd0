//! Substring search across the wrap boundary
//!
//! A search range may straddle the end of the active region, in which case it
//! is seen as two slices. Matching is a plain double-pointer scan that retries
//! from every candidate start, so patterns with repeated prefixes are found at
//! their first occurrence.

use super::geometry::normalize_slice;
use super::reserve::Guard;
use super::RingBuffer;
use crate::error::{Error, Result};
use std::ops::Range;

impl RingBuffer {
    /// Lowest logical position of `pattern` within `[start, end)`
    ///
    /// # Arguments
    ///
    /// * `pattern` - Bytes to look for
    /// * `start` - First logical index searched; negative counts from the end
    /// * `end` - End of the searched range; `-1` searches through the last byte
    ///
    /// # Returns
    ///
    /// `Some(position)` of the first match, `None` when there is none
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty pattern or one longer than the stored
    /// data, `Reserved` while a read reservation is held.
    pub fn find(&self, pattern: &[u8], start: isize, end: isize) -> Result<Option<usize>> {
        self.check_search(pattern)?;

        Ok(normalize_slice(self.len(), start, end)
            .and_then(|range| self.search_range(pattern, range)))
    }

    /// Like [`find`](RingBuffer::find), but a missing match is `NotFound`
    pub fn index(&self, pattern: &[u8], start: isize, end: isize) -> Result<usize> {
        self.find(pattern, start, end)?.ok_or(Error::NotFound)
    }

    /// Number of non-overlapping occurrences of `pattern` within `[start, end)`
    ///
    /// # Arguments
    ///
    /// * `pattern` - Bytes to count
    /// * `start`, `end` - Searched range, as for [`find`](RingBuffer::find)
    ///
    /// # Returns
    ///
    /// Matches counted left to right, each resuming after the previous one
    pub fn count(&self, pattern: &[u8], start: isize, end: isize) -> Result<usize> {
        self.check_search(pattern)?;

        let Some(range) = normalize_slice(self.len(), start, end) else {
            return Ok(0);
        };

        let mut count = 0;
        let mut pos = range.start;
        while let Some(found) = self.search_range(pattern, pos..range.end) {
            count += 1;
            pos = found + pattern.len();
        }
        Ok(count)
    }

    /// Whether the stored data begins with `prefix`
    pub fn startswith(&self, prefix: &[u8]) -> Result<bool> {
        self.check_search(prefix)?;

        let (head, tail) = self.range_slices(0..prefix.len());
        let (front, back) = prefix.split_at(head.len());
        Ok(head == front && tail == back)
    }

    /// Whether `pattern` occurs anywhere in the stored data
    ///
    /// Empty patterns and patterns longer than the data are never contained.
    pub fn contains(&self, pattern: &[u8]) -> bool {
        if pattern.is_empty() || pattern.len() > self.len() {
            return false;
        }
        self.search_range(pattern, 0..self.len()).is_some()
    }

    fn check_search(&self, pattern: &[u8]) -> Result<()> {
        self.reservations.check(&[Guard::Read])?;

        if pattern.is_empty() {
            return Err(Error::InvalidArgument("search pattern is empty"));
        }
        if pattern.len() > self.len() {
            return Err(Error::InvalidArgument(
                "search pattern is longer than the stored data",
            ));
        }
        Ok(())
    }

    /// Logical position of the first match inside a normalized range
    fn search_range(&self, pattern: &[u8], range: Range<usize>) -> Option<usize> {
        let offset = range.start;
        let (head, tail) = self.range_slices(range);
        find_split(head, tail, pattern).map(|found| offset + found)
    }
}

/// First match of `pattern` in the concatenation of `head` and `tail`
fn find_split(head: &[u8], tail: &[u8], pattern: &[u8]) -> Option<usize> {
    debug_assert!(!pattern.is_empty());

    if tail.is_empty() {
        return head.windows(pattern.len()).position(|window| window == pattern);
    }

    let last = (head.len() + tail.len()).checked_sub(pattern.len())?;
    let byte_at = |i: usize| {
        if i < head.len() {
            head[i]
        } else {
            tail[i - head.len()]
        }
    };

    (0..=last).find(|&candidate| {
        pattern
            .iter()
            .enumerate()
            .all(|(i, &byte)| byte_at(candidate + i) == byte)
    })
}
