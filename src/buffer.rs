//! Shared bounded buffer between producers and the consumer
//!
//! Thin typed wrapper over a bounded crossbeam channel. The capacity bound is
//! the only backpressure mechanism: `push` blocks while the buffer is full.
//! The buffer closes for writing when the last `MatchWriter` is dropped, which
//! happens once every producer has finished; `pop` then drains the remaining
//! items and reports end-of-input. A dropped `MatchReader` (failed consumer)
//! wakes every blocked pusher with `BufferClosed` instead of leaving it
//! parked forever.

use crossbeam_channel::{bounded, Receiver, Sender};

/// Reference capacity of the shared match buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 100;

/// Push failed because the consumer is gone; the item is discarded
#[derive(Debug, PartialEq, Eq)]
pub struct BufferClosed;

/// Producer-side handle. Cloned once per producer thread.
#[derive(Clone)]
pub struct MatchWriter {
    tx: Sender<String>,
}

impl MatchWriter {
    /// Append one matched line, blocking while the buffer is full
    pub fn push(&self, line: String) -> Result<(), BufferClosed> {
        self.tx.send(line).map_err(|_| BufferClosed)
    }
}

/// Consumer-side handle. Exactly one exists per pipeline.
pub struct MatchReader {
    rx: Receiver<String>,
}

impl MatchReader {
    /// Take the next matched line, blocking while the buffer is empty.
    /// Returns `None` only once the buffer is closed for writing and drained.
    pub fn pop(&self) -> Option<String> {
        self.rx.recv().ok()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

/// Create the shared buffer with the given capacity (must be > 0)
pub fn match_buffer(capacity: usize) -> (MatchWriter, MatchReader) {
    let (tx, rx) = bounded(capacity);
    (MatchWriter { tx }, MatchReader { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_pop_drains_then_signals_end_of_input() {
        let (writer, reader) = match_buffer(10);
        writer.push("a".to_string()).unwrap();
        writer.push("b".to_string()).unwrap();
        drop(writer);

        assert_eq!(reader.pop(), Some("a".to_string()));
        assert_eq!(reader.pop(), Some("b".to_string()));
        assert_eq!(reader.pop(), None);
    }

    #[test]
    fn test_push_blocks_when_full() {
        let (writer, reader) = match_buffer(1);
        let second_push_done = Arc::new(AtomicBool::new(false));
        let done_flag = Arc::clone(&second_push_done);

        let producer = thread::spawn(move || {
            writer.push("first".to_string()).unwrap();
            // Buffer is full now; this push must block until the consumer
            // drains the first item.
            writer.push("second".to_string()).unwrap();
            done_flag.store(true, Ordering::SeqCst);
        });

        // Give the producer time to hit the full buffer
        thread::sleep(Duration::from_millis(100));
        assert!(
            !second_push_done.load(Ordering::SeqCst),
            "second push should be blocked on the full buffer"
        );
        assert_eq!(reader.len(), 1, "buffer must not grow past its capacity");

        assert_eq!(reader.pop(), Some("first".to_string()));
        assert_eq!(reader.pop(), Some("second".to_string()));
        producer.join().unwrap();
        assert!(second_push_done.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropped_reader_unblocks_pushers() {
        let (writer, reader) = match_buffer(1);
        writer.push("fills the buffer".to_string()).unwrap();

        let producer = thread::spawn(move || writer.push("would block".to_string()));

        thread::sleep(Duration::from_millis(50));
        drop(reader);

        // The blocked push must fail rather than hang
        assert_eq!(producer.join().unwrap(), Err(BufferClosed));
    }

    #[test]
    fn test_per_producer_order_preserved() {
        let (writer, reader) = match_buffer(100);
        for i in 0..10 {
            writer.push(format!("line {}", i)).unwrap();
        }
        drop(writer);

        let drained: Vec<String> = std::iter::from_fn(|| reader.pop()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("line {}", i)).collect();
        assert_eq!(drained, expected);
    }
}
