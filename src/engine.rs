use crate::granularity::Granularity;
use crate::record::Record;
use crate::stats::BucketStats;
use crate::Timestamp;

/// Maps each bucket's start timestamp to the statistics accumulated for it.
pub type BucketMap = crate::HashMap<Timestamp, BucketStats>;

/// Folds records into per-bucket statistics at the given granularity.
///
/// Records may arrive in any order. Each one is routed to the accumulator
/// of its floored timestamp, created lazily when the bucket is first seen.
/// Single pass, O(records) time, O(distinct buckets) space.
///
/// Iteration order of the returned map is unspecified; the report layer
/// sorts.
///
/// # Errors
///
/// Returns an error if a record violates the throughput/message invariant.
/// No partial result is handed out in that case.
pub fn analyze(records: &[Record], granularity: Granularity) -> crate::Result<BucketMap> {
    let mut buckets = BucketMap::default();

    for record in records {
        let bucket = granularity.floor(record.timestamp);

        buckets
            .entry(bucket)
            .or_insert_with(|| BucketStats::new(bucket))
            .add(record)?;
    }

    log::debug!(
        "bucketed {} records into {} bucket(s) at {granularity} granularity",
        records.len(),
        buckets.len(),
    );

    Ok(buckets)
}

/// Merges a partial bucket map into another.
///
/// Buckets present on both sides consolidate via [`BucketStats::merge`];
/// buckets only present in `from` move over unchanged. Partition boundaries
/// and merge order do not affect the result.
pub fn merge(into: &mut BucketMap, from: BucketMap) {
    for (bucket, stats) in from {
        into.entry(bucket)
            .and_modify(|existing| existing.merge(&stats))
            .or_insert(stats);
    }
}
