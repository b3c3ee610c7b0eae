//! Result persistence
//!
//! The sink receives matched lines in arrival order and persists them. Any
//! sink failure is fatal to the whole run, unlike per-source scan failures.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal output-side failures
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot create output file '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write to '{path}' failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("flush of '{path}' failed: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Durable destination for matched lines, written in arrival order
pub trait ResultSink: Send {
    fn write(&mut self, line: &str) -> Result<(), SinkError>;

    /// Called exactly once at end of run, even after a write failure
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// File-backed sink with truncate-create semantics
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Create (or truncate) the output file. Failing here aborts the run
    /// before any producer starts.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| SinkError::Create {
            path: path.clone(),
            source: e,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }
}

impl ResultSink for FileSink {
    fn write(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", line).map_err(|e| SinkError::Write {
            path: self.path.clone(),
            source: e,
        })
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|e| SinkError::Flush {
            path: self.path.clone(),
            source: e,
        })
    }
}
