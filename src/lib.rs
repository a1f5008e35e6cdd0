//! Ring Byte Buffer - a growable circular buffer for byte streams
//!
//! # Overview
//!
//! [`RingBuffer`] stores a stream of bytes in a fixed-origin circular array.
//! Writes append at the back and wrap around the end of the storage, reads
//! consume from the front, and the stored data can be searched, indexed and
//! sliced in place without first being copied out.
//!
//! # Key Features
//!
//! - Wrap-around storage with one separator slot, so equal cursors always mean empty
//! - Growth that is deferred while data is wrapped and applied once it is not
//! - Substring search, prefix tests and counting across the wrap boundary
//! - Realignment of wrapped data into one run using at most half the
//!   capacity as scratch space
//! - Zero-copy views guarded by non-blocking reservation counters
//!
//! # Usage
//!
//! ```
//! use ring_byte_buffer::RingBuffer;
//!
//! let mut buffer = RingBuffer::new(8)?;
//! buffer.write(b"ABCDEFG")?;
//! assert_eq!(buffer.read(Some(3))?, b"ABC");
//!
//! // Wraps around the end of the storage
//! buffer.write(b"XYZ")?;
//! assert_eq!(buffer.find(b"GX", 0, -1)?, Some(3));
//!
//! // A view realigns the data into one contiguous slice
//! assert_eq!(&*buffer.view()?, b"DEFGXYZ");
//! # Ok::<(), ring_byte_buffer::Error>(())
//! ```
//!
//! Operations never block. One that conflicts with an outstanding reservation
//! fails with [`Error::Reserved`] and leaves the buffer unchanged.

#![deny(missing_docs)]

mod config;
mod error;
mod ring;
mod shared;

pub use config::{RingBufferConfig, DEFAULT_PREVIEW_LEN};
pub use error::{Error, Result};
pub use ring::geometry::normalize_slice;
pub use ring::reserve::{Guard, RawView, Reservations, View};
pub use ring::RingBuffer;
pub use shared::SharedRingBuffer;
