//! Consumer thread: drains the shared buffer into the sink

use std::sync::Arc;

use crate::buffer::MatchReader;
use crate::sink::{ResultSink, SinkError};

use super::coordinator::ShutdownState;

/// Drain matched lines until the buffer is closed and empty, persisting each
/// in arrival order. Returns the number of lines written.
///
/// A graceful shutdown still drains everything the producers buffered; an
/// immediate one discards the backlog. The sink is flushed exactly once, even
/// when a write fails mid-run. On failure the `MatchReader` is dropped on
/// return, which unblocks every producer still waiting to push.
pub(crate) fn consumer_thread<K: ResultSink>(
    reader: MatchReader,
    mut sink: K,
    shutdown: Arc<ShutdownState>,
) -> Result<u64, SinkError> {
    let mut written = 0u64;

    while !shutdown.immediate() {
        let Some(line) = reader.pop() else {
            break;
        };
        if let Err(e) = sink.write(&line) {
            // Leave the output in a consistent state before surfacing the error
            let _ = sink.flush();
            return Err(e);
        }
        written += 1;
    }

    sink.flush()?;
    Ok(written)
}
