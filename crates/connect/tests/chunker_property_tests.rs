//! Property-based tests for the date-range chunker.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use ledgerlink_connect::bank::chunker::chunk_range;

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

proptest! {
    /// Concatenating the chunks reconstructs `[from, to)` exactly:
    /// first chunk starts at `from`, last ends at `to`, and consecutive
    /// chunks share a boundary (no gaps, no overlaps).
    #[test]
    fn chunks_reconstruct_range(
        from_secs in 0i64..4_000_000_000,
        span_secs in 1i64..200_000_000,
        max_span_secs in 1i64..10_000_000,
    ) {
        let from = timestamp(from_secs);
        let to = timestamp(from_secs + span_secs);
        let max_span = Duration::seconds(max_span_secs);

        let chunks = chunk_range(from, to, max_span).unwrap();

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks.first().unwrap().from, from);
        prop_assert_eq!(chunks.last().unwrap().to, to);
        for pair in chunks.windows(2) {
            prop_assert_eq!(pair[0].to, pair[1].from);
        }
    }

    /// Every chunk is non-empty and no wider than the configured span.
    #[test]
    fn chunks_respect_max_span(
        from_secs in 0i64..4_000_000_000,
        span_secs in 1i64..200_000_000,
        max_span_secs in 1i64..10_000_000,
    ) {
        let from = timestamp(from_secs);
        let to = timestamp(from_secs + span_secs);
        let max_span = Duration::seconds(max_span_secs);

        for chunk in chunk_range(from, to, max_span).unwrap() {
            prop_assert!(chunk.from < chunk.to);
            prop_assert!(chunk.to - chunk.from <= max_span);
        }
    }

    /// An empty or inverted range yields no chunks.
    #[test]
    fn empty_range_yields_no_chunks(
        from_secs in 0i64..4_000_000_000,
        backwards_secs in 0i64..200_000_000,
        max_span_secs in 1i64..10_000_000,
    ) {
        let from = timestamp(from_secs);
        let to = timestamp(from_secs - backwards_secs);
        let chunks = chunk_range(from, to, Duration::seconds(max_span_secs)).unwrap();
        prop_assert!(chunks.is_empty());
    }

    /// Chunking is deterministic: identical inputs replay identically.
    #[test]
    fn chunking_is_replayable(
        from_secs in 0i64..4_000_000_000,
        span_secs in 0i64..200_000_000,
        max_span_secs in 1i64..10_000_000,
    ) {
        let from = timestamp(from_secs);
        let to = timestamp(from_secs + span_secs);
        let max_span = Duration::seconds(max_span_secs);

        prop_assert_eq!(
            chunk_range(from, to, max_span).unwrap(),
            chunk_range(from, to, max_span).unwrap()
        );
    }
}
