//! # Byte Range Handling
//!
//! Parsing and clamping of `Range: bytes=<start>-<end?>` requests, and the
//! seek-and-take file body that streams exactly the requested span without
//! ever buffering the whole asset.
//!
//! An absent start defaults to 0 and an absent end to `total - 1`; the end is
//! clamped to the last byte. A range that is empty after clamping is
//! unsatisfiable and answered with 416 rather than a zero-length slice.
//! A `Range` value that does not match the pattern at all is ignored and the
//! request served whole.

use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::trace;

/// An inclusive, clamped byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Inclusive span length; a `ByteRange` is always at least one byte.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// What a `Range` header means for an asset of `total` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable range; serve the entire asset with 200.
    Full,
    /// Serve this span with 206.
    Partial(ByteRange),
    /// Empty after clamping; answer 416.
    Unsatisfiable,
}

/// Interpret a `Range` header value against an asset size.
pub fn interpret(header: Option<&str>, total: u64) -> RangeOutcome {
    let Some(value) = header else {
        return RangeOutcome::Full;
    };
    let Some((start, end)) = parse_bytes_spec(value) else {
        // Unparseable range values fall back to the whole asset.
        trace!(value, "ignoring unparseable range header");
        return RangeOutcome::Full;
    };

    if total == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    let start = start.unwrap_or(0);
    let end = end.unwrap_or(total - 1).min(total - 1);
    if start > end {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange { start, end })
}

/// Parse `bytes=<start?>-<end?>`; `None` when the shape does not match.
/// At least one bound must be present.
fn parse_bytes_spec(value: &str) -> Option<(Option<u64>, Option<u64>)> {
    let spec = value.trim().strip_prefix("bytes=")?;
    let (start_str, end_str) = spec.split_once('-')?;

    let parse_bound = |s: &str| -> Option<Option<u64>> {
        if s.is_empty() {
            Some(None)
        } else {
            s.parse::<u64>().ok().map(Some)
        }
    };

    let start = parse_bound(start_str)?;
    let end = parse_bound(end_str)?;
    if start.is_none() && end.is_none() {
        return None;
    }
    Some((start, end))
}

/// Open `path` and produce a stream over `[start, start + len)`.
///
/// The stream owns the file handle; dropping the response body (client
/// abort included) releases it.
pub async fn stream_file_span(
    path: &Path,
    start: u64,
    len: u64,
) -> std::io::Result<ReaderStream<tokio::io::Take<File>>> {
    let mut file = File::open(path).await?;
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(ReaderStream::new(file.take(len)))
}
