//! End-to-end scenarios for the ring buffer

use ring_byte_buffer::{Error, Guard, RingBuffer, RingBufferConfig, SharedRingBuffer};
use std::sync::{Arc, Barrier};
use std::thread;

/// Fill to capacity, consume part, then wrap
#[test]
fn test_fill_read_wrap() {
    let mut buffer = RingBuffer::new(8).unwrap();

    assert_eq!(buffer.write(b"ABCDEFG").unwrap(), 7, "Seven usable bytes");
    assert_eq!(buffer.write_available(), 0, "Buffer should be full");

    assert_eq!(buffer.read(Some(3)).unwrap(), b"ABC");
    assert_eq!(buffer.write_available(), 3);

    assert_eq!(buffer.write(b"XYZ").unwrap(), 3);
    assert!(buffer.is_wrapped(), "Write should have wrapped to the start");
    assert_eq!(buffer.read(Some(7)).unwrap(), b"DEFGXYZ");
}

/// Write cursor wraps exactly when it reaches the active bound
#[test]
fn test_wrap_point() {
    let capacity = 10;
    let mut buffer = RingBuffer::new(capacity).unwrap();

    for k in 1..capacity - 1 {
        buffer.clear().unwrap();
        buffer.write(&[b'.'; 9]).unwrap();
        buffer.read(Some(k)).unwrap();

        // One byte reaches the end of storage, the rest lands at the start
        let fresh: Vec<u8> = (0..k as u8).map(|i| b'a' + i).collect();
        assert_eq!(buffer.write(&fresh).unwrap(), k);
        assert!(buffer.is_wrapped(), "k = {k}");
        assert_eq!(buffer.forward_length(0), k - 1, "k = {k}");

        let data = buffer.read_all().unwrap();
        assert_eq!(&data[9 - k..], &fresh[..], "k = {k}");
    }
}

/// Small buffer search from the scenario list
#[test]
fn test_find_small() {
    let mut buffer = RingBuffer::new(4).unwrap();
    buffer.write(b"AB").unwrap();

    assert_eq!(buffer.find(b"B", 0, -1).unwrap(), Some(1));
    assert_eq!(buffer.find(b"C", 0, -1).unwrap(), None);
    assert_eq!(buffer.index(b"C", 0, -1), Err(Error::NotFound));
}

/// A view on wrapped data realigns once; later writes do not realign again
#[test]
fn test_view_then_write() {
    let mut buffer = RingBuffer::new(16).unwrap();
    buffer.write(b"0123456789").unwrap();
    buffer.read(Some(8)).unwrap();
    buffer.write(b"abcdefghij").unwrap();
    assert!(buffer.is_wrapped());

    {
        let view = buffer.view().unwrap();
        assert_eq!(&*view, b"89abcdefghij");
    }
    assert!(!buffer.is_wrapped());
    assert_eq!(buffer.translate(0), Some(0), "Realigned data starts at zero");
    assert!(buffer.reservations().is_clear(), "View released on drop");

    assert_eq!(buffer.write(b"XYZ").unwrap(), 3);
    assert!(!buffer.is_wrapped());
    assert_eq!(buffer.translate(0), Some(0));
    assert_eq!(buffer.as_slices().0, b"89abcdefghijXYZ");
}

/// A view is released even when the scope using it unwinds
#[test]
fn test_view_released_on_panic() {
    let mut buffer = RingBuffer::new(16).unwrap();
    buffer.write(b"hello").unwrap();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let view = buffer.view().unwrap();
        assert_eq!(&*view, b"hello");
        panic!("scope failed");
    }));
    assert!(result.is_err());

    assert_eq!(buffer.reservations().view, 0);
    assert_eq!(buffer.read_all().unwrap(), b"hello");
}

/// Protocol-style processing: match a frame in a view, then consume it
#[test]
fn test_frame_processing() {
    let mut buffer = RingBuffer::new(1024).unwrap();
    let frame = b"\r\nOK\r\n";

    for _ in 0..2 {
        buffer.write(frame).unwrap();
        let matched = buffer.view().unwrap().starts_with(frame);
        assert!(matched, "Frame should be at the front");
        assert_eq!(buffer.read(Some(frame.len())).unwrap(), frame);
    }

    buffer.write(b"\r\n+CGML:").unwrap();
    assert!(!buffer.startswith(frame).unwrap_or(false));
    assert!(buffer.contains(b"CGML"));
}

/// Growing while wrapped waits for the data to unwrap
#[test]
fn test_resize_while_wrapped() {
    let mut buffer = RingBuffer::new(16).unwrap();
    buffer.write(b"1234567890").unwrap();
    buffer.read(Some(9)).unwrap();
    buffer.write(b"abcdefghijklmn").unwrap();
    assert!(buffer.is_wrapped());

    let available = buffer.write_available();
    buffer.resize(32).unwrap();
    assert_eq!(buffer.active_bound(), 16, "Grow must not apply while wrapped");
    assert_eq!(buffer.write_available(), available);
    assert_eq!(buffer.capacity(), 32);

    // Writing cannot unwrap the buffer, so the grow is still pending
    buffer.write(b"!").unwrap();
    assert_eq!(buffer.active_bound(), 16);

    let content = buffer.to_vec();
    assert_eq!(buffer.read(Some(7)).unwrap(), &content[..7]);
    assert!(!buffer.is_wrapped());
    assert_eq!(buffer.active_bound(), 32);
    assert_eq!(buffer.write_available(), 31 - buffer.len());
}

/// Clearing is refused while any scope is open
#[test]
fn test_clear_refused_while_reserved() {
    let mut buffer = RingBuffer::new(8).unwrap();
    buffer.write(b"abc").unwrap();

    for guard in [Guard::Read, Guard::Write, Guard::View] {
        buffer.reserve(guard).unwrap();
        assert_eq!(buffer.clear(), Err(Error::Reserved(guard)));
        assert_eq!(buffer.len(), 3, "Refused clear must not change state");
        buffer.release(guard).unwrap();
    }

    buffer.clear().unwrap();
    assert!(buffer.is_empty());
}

/// Releasing a scope that was never opened is rejected
#[test]
fn test_unbalanced_release() {
    let mut buffer = RingBuffer::new(8).unwrap();
    assert!(matches!(
        buffer.release(Guard::Read),
        Err(Error::InvalidArgument(_))
    ));
    assert!(buffer.release_view().is_err());
}

/// Configuration controls the preview length
#[test]
fn test_config_preview() {
    let config = RingBufferConfig {
        capacity: 128,
        preview_len: 24,
    };
    let mut buffer = RingBuffer::with_config(config).unwrap();
    buffer.write(&[b'x'; 100]).unwrap();

    let preview = format!("{buffer:?}");
    assert_eq!(preview.len(), 24);
    assert!(preview.starts_with("<RingBuffer[100]:"));
    assert!(preview.ends_with("..>"));
    assert_eq!(RingBufferConfig::default().preview_len, 64);
}

/// Producer and consumer threads hand bytes through a shared buffer
#[test]
fn test_shared_producer_consumer() {
    const TOTAL: usize = 10_000;

    let shared = SharedRingBuffer::new(RingBuffer::new(64).unwrap());
    let barrier = Arc::new(Barrier::new(2));

    let producer = {
        let shared = shared.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            let mut sent = 0;
            while sent < TOTAL {
                let byte = (sent % 251) as u8;
                sent += shared.with(|buffer| buffer.write(&[byte]).unwrap());
                thread::yield_now();
            }
        })
    };

    barrier.wait();
    let mut received = Vec::with_capacity(TOTAL);
    while received.len() < TOTAL {
        let chunk = shared.with(|buffer| buffer.read(None).unwrap());
        received.extend_from_slice(&chunk);
        thread::yield_now();
    }
    producer.join().unwrap();

    for (i, byte) in received.iter().enumerate() {
        assert_eq!(*byte, (i % 251) as u8, "Byte {i} out of order");
    }
}
