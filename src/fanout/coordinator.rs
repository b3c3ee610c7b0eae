//! Pipeline coordinator
//!
//! Owns the shared buffer and the producer/consumer thread lifecycle. The
//! consumer starts first so it is ready to drain; the buffer closes for
//! writing once the last producer drops its writer handle; the run completes
//! only after the consumer has drained and flushed. Ctrl messages are relayed
//! into a [`ShutdownState`] shared by every thread, so a single shutdown
//! request stops the whole pipeline.

use crossbeam_channel::Receiver;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

use crate::buffer::match_buffer;
use crate::matcher::Matcher;
use crate::platform::Ctrl;
use crate::scanner::{ScanError, SourceScanner};
use crate::sink::{ResultSink, SinkError};

use super::consumer::consumer_thread;
use super::producer::producer_thread;

/// Fatal pipeline failures. Per-source scan errors are not fatal and are
/// reported through [`PipelineSummary::source_errors`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct PipelineSummary {
    /// Lines the consumer durably persisted
    pub matches_written: u64,
    /// Per-source failures; the affected sources contributed partial or no
    /// output, all other sources completed normally
    pub source_errors: Vec<ScanError>,
}

/// Shutdown request visible to every pipeline thread at once. A ctrl message
/// is consumed by whichever thread receives it first, so the coordinator
/// relays it into these flags instead of handing the channel to the threads.
#[derive(Debug, Default)]
pub(crate) struct ShutdownState {
    requested: AtomicBool,
    immediate: AtomicBool,
}

impl ShutdownState {
    /// Stop scanning; buffered matches are still drained
    pub(crate) fn requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    /// Stop draining too; buffered matches are discarded
    pub(crate) fn immediate(&self) -> bool {
        self.immediate.load(Ordering::Relaxed)
    }

    fn record(&self, immediate: bool) {
        if immediate {
            self.immediate.store(true, Ordering::Relaxed);
        }
        self.requested.store(true, Ordering::Relaxed);
    }
}

/// Fan-out/fan-in pipeline over one shared bounded buffer
pub struct FanOutPipeline {
    capacity: usize,
}

impl FanOutPipeline {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Run the pipeline to completion: every matched line from every readable
    /// source is persisted exactly once, then the sink is flushed.
    pub fn run<S, M, K>(
        &self,
        sources: &[PathBuf],
        scanner: S,
        matcher: M,
        sink: K,
        ctrl_rx: Receiver<Ctrl>,
    ) -> Result<PipelineSummary, PipelineError>
    where
        S: SourceScanner + 'static,
        M: Matcher + 'static,
        K: ResultSink + 'static,
    {
        let (writer, reader) = match_buffer(self.capacity);
        let shutdown = Arc::new(ShutdownState::default());

        // Relay ctrl messages into the shared flags so one message reaches
        // every thread. The relay exits when the sender side disconnects or
        // after an immediate shutdown; it is deliberately not joined, since
        // the sender may outlive the run.
        {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                while let Ok(Ctrl::Shutdown { immediate }) = ctrl_rx.recv() {
                    shutdown.record(immediate);
                    if immediate {
                        break;
                    }
                }
            });
        }

        let consumer_shutdown = Arc::clone(&shutdown);
        let consumer_handle =
            thread::spawn(move || consumer_thread(reader, sink, consumer_shutdown));

        let scanner = Arc::new(scanner);
        let matcher = Arc::new(matcher);
        let mut producer_handles = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.clone();
            let scanner = Arc::clone(&scanner);
            let matcher = Arc::clone(&matcher);
            let writer = writer.clone();
            let shutdown = Arc::clone(&shutdown);

            producer_handles.push(thread::spawn(move || {
                producer_thread(source, scanner, matcher, writer, shutdown)
            }));
        }

        // The buffer closes for writing once the last producer finishes
        drop(writer);

        let mut source_errors = Vec::new();
        for (idx, handle) in producer_handles.into_iter().enumerate() {
            let result = handle
                .join()
                .unwrap_or_else(|e| panic!("Producer thread {} panicked: {:?}", idx, e));
            if let Err(e) = result {
                source_errors.push(e);
            }
        }

        let matches_written = consumer_handle
            .join()
            .unwrap_or_else(|e| panic!("Consumer thread panicked: {:?}", e))?;

        Ok(PipelineSummary {
            matches_written,
            source_errors,
        })
    }
}
