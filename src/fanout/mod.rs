//! Fan-out/fan-in extraction pipeline
//!
//! One producer thread per source feeds matched lines into the shared bounded
//! buffer; a single consumer thread drains the buffer into the sink. The
//! coordinator owns thread lifecycle and error aggregation.
//!
//! # Module Structure
//!
//! - `producer`: per-source scan-and-match thread
//! - `consumer`: single drain-and-persist thread
//! - `coordinator`: spawn/join orchestration and the pipeline result types

mod consumer;
mod coordinator;
mod producer;

pub use coordinator::{FanOutPipeline, PipelineError, PipelineSummary};
