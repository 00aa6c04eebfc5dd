//! Date-range chunking for gateway fetch windows.

use chrono::{DateTime, Duration, Utc};

use ledgerlink_core::errors::{Error, Result};

/// Maximum window width accepted by the gateway per transactions request,
/// counting both endpoint days.
pub const GATEWAY_MAX_WINDOW_DAYS: i64 = 31;

/// Span used for chunked fetches. Chunks are half-open while the gateway
/// counts both endpoint days, so a safe chunk covers one day less than the
/// gateway limit.
pub const SYNC_CHUNK_SPAN_DAYS: i64 = GATEWAY_MAX_WINDOW_DAYS - 1;

/// A bounded sub-interval of a sync range. Half-open: `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChunk {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Splits `[from, to)` into ordered chunks of at most `max_span`.
///
/// The output covers the input exactly: no gaps, no overlaps, and the final
/// chunk's `to` equals the input `to`. `from >= to` yields an empty sequence
/// rather than an error. The result is deterministic, so retries replay the
/// same windows.
///
/// A non-positive `max_span` would loop forever and is rejected up front,
/// before any I/O happens downstream.
pub fn chunk_range(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    max_span: Duration,
) -> Result<Vec<DateChunk>> {
    if max_span <= Duration::zero() {
        return Err(Error::InvalidConfigValue(format!(
            "chunk span must be positive, got {max_span}"
        )));
    }

    let mut chunks = Vec::new();
    let mut cursor = from;
    while cursor < to {
        let end = (cursor + max_span).min(to);
        chunks.push(DateChunk {
            from: cursor,
            to: end,
        });
        cursor = end;
    }
    Ok(chunks)
}
