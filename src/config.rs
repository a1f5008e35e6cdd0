//! Construction-time configuration for [`RingBuffer`](crate::RingBuffer)

/// Default preview length used by `Debug` and [`RingBuffer::preview`](crate::RingBuffer::preview)
pub const DEFAULT_PREVIEW_LEN: usize = 64;

/// Configuration for a new ring buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBufferConfig {
    /// Number of physical slots; one slot is always kept free, so
    /// `capacity - 1` bytes can be stored
    pub capacity: usize,
    /// Maximum length in bytes of the rendered preview
    pub preview_len: usize,
}

impl RingBufferConfig {
    /// Configuration with the given capacity and default preview length
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

impl Default for RingBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}
