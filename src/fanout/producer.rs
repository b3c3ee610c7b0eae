//! Producer thread: scans one source and emits matching lines

use std::path::PathBuf;
use std::sync::Arc;

use crate::buffer::MatchWriter;
use crate::matcher::Matcher;
use crate::scanner::{ScanError, SourceScanner};

use super::coordinator::ShutdownState;

/// Scan `source`, apply the matcher, and push matches into the shared buffer.
///
/// A scan failure is terminal for this source only and is returned for the
/// coordinator to aggregate. A failed push means the consumer is gone; the
/// producer stops quietly and lets the coordinator surface the fatal error
/// from the consumer side.
pub(crate) fn producer_thread<S, M>(
    source: PathBuf,
    scanner: Arc<S>,
    matcher: Arc<M>,
    writer: MatchWriter,
    shutdown: Arc<ShutdownState>,
) -> Result<(), ScanError>
where
    S: SourceScanner,
    M: Matcher,
{
    let lines = scanner.scan(&source)?;

    for line_result in lines {
        if shutdown.requested() {
            return Ok(());
        }

        let line = line_result?;
        if matcher.matches(&line) && writer.push(line).is_err() {
            return Ok(());
        }
    }

    Ok(())
}
