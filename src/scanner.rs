//! Source scanning
//!
//! A scanner turns one source path into a lazy, finite sequence of lines.
//! Compressed sources (gzip, zstd) are detected by magic bytes and
//! decompressed transparently, so `*.log.gz` archives scan like plain files.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Terminal scan failures, isolated to one source
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read failed on '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Open { path, .. } | ScanError::Read { path, .. } => path,
        }
    }
}

/// Produces a lazy line sequence for one source
pub trait SourceScanner: Send + Sync {
    fn scan(&self, source: &Path) -> Result<LineIter, ScanError>;
}

/// Lazy iterator over the lines of one opened source
pub struct LineIter {
    reader: Box<dyn BufRead + Send>,
    path: PathBuf,
    buffer: String,
    failed: bool,
}

impl LineIter {
    /// Wrap an already-opened reader; the path is only used in error reports
    pub fn new(reader: Box<dyn BufRead + Send>, path: PathBuf) -> Self {
        Self {
            reader,
            path,
            buffer: String::new(),
            failed: false,
        }
    }
}

impl Iterator for LineIter {
    type Item = Result<String, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(self
                .buffer
                .trim_end_matches(&['\n', '\r'][..])
                .to_string())),
            Err(e) => {
                // A mid-stream error is terminal for this source
                self.failed = true;
                Some(Err(ScanError::Read {
                    path: self.path.clone(),
                    source: e,
                }))
            }
        }
    }
}

/// Scans files from the local filesystem with transparent decompression
pub struct FileScanner;

impl SourceScanner for FileScanner {
    fn scan(&self, source: &Path) -> Result<LineIter, ScanError> {
        let file = File::open(source).map_err(|e| ScanError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;

        let reader = open_maybe_compressed(file).map_err(|e| ScanError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;

        Ok(LineIter::new(reader, source.to_path_buf()))
    }
}

/// Sniff gzip (1F 8B 08) and zstd (28 B5 2F FD) magic bytes, replaying the
/// sniffed prefix through a cursor chain for plain files
fn open_maybe_compressed(mut file: File) -> std::io::Result<Box<dyn BufRead + Send>> {
    let mut head = [0u8; 4];
    let mut filled = 0;
    while filled < head.len() {
        let n = file.read(&mut head[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let prefix = Cursor::new(head[..filled].to_vec());
    let chained = prefix.chain(file);

    let is_gzip = filled >= 3 && head[0] == 0x1F && head[1] == 0x8B && head[2] == 0x08;
    let is_zstd =
        filled >= 4 && head[0] == 0x28 && head[1] == 0xB5 && head[2] == 0x2F && head[3] == 0xFD;

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(chained))))
    } else if is_zstd {
        Ok(Box::new(BufReader::new(zstd::Decoder::new(chained)?)))
    } else {
        Ok(Box::new(BufReader::new(chained)))
    }
}
