use crate::record::{Outcome, Record, RecordError};
use crate::{Timestamp, Value};
use chrono::{DateTime, TimeDelta, Utc};

/// Running statistics for one time bucket.
///
/// Timestamp extrema cover every record folded in; duration and throughput
/// extrema and sums cover success records only, error duration covers error
/// records only. A fresh accumulator holds sentinel extrema (`u64::MAX` as
/// min duration, 0 as max, and so on) that any real record displaces;
/// getters expose them raw, so a bucket without a single success record
/// reports the sentinels.
///
/// Derived metrics (averages, error rate, fitness) are computed on demand
/// and never stored.
///
/// [`BucketStats::merge`] consolidates two accumulators of the same bucket
/// as if their records had been folded sequentially. The operation is
/// associative and commutative, with the fresh accumulator as identity, so
/// slices of a dataset can be processed independently and merged in any
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketStats {
    bucket: Timestamp,

    min_timestamp: Timestamp,
    max_timestamp: Timestamp,

    success_count: u64,
    error_count: u64,

    total_duration: u64,
    total_throughput: Value,
    total_error_duration: u64,

    min_duration: u64,
    max_duration: u64,
    min_throughput: Value,
    max_throughput: Value,
}

impl BucketStats {
    /// Creates an empty accumulator for the given bucket.
    #[must_use]
    pub fn new(bucket: Timestamp) -> Self {
        Self {
            bucket,
            min_timestamp: DateTime::<Utc>::MAX_UTC.fixed_offset(),
            max_timestamp: DateTime::<Utc>::MIN_UTC.fixed_offset(),
            success_count: 0,
            error_count: 0,
            total_duration: 0,
            total_throughput: 0.0,
            total_error_duration: 0,
            min_duration: u64::MAX,
            max_duration: 0,
            min_throughput: Value::MAX,
            max_throughput: 0.0,
        }
    }

    /// Folds one record into the bucket.
    ///
    /// The record is classified first; an invalid record is rejected before
    /// any field is touched, leaving the accumulator exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the record violates the throughput/message
    /// invariant.
    pub fn add(&mut self, record: &Record) -> Result<(), RecordError> {
        let outcome = record.outcome()?;

        self.min_timestamp = self.min_timestamp.min(record.timestamp);
        self.max_timestamp = self.max_timestamp.max(record.timestamp);

        match outcome {
            Outcome::Success => {
                self.success_count += 1;
                self.total_duration += record.duration;
                self.total_throughput += record.throughput;
                self.min_duration = self.min_duration.min(record.duration);
                self.max_duration = self.max_duration.max(record.duration);
                self.min_throughput = self.min_throughput.min(record.throughput);
                self.max_throughput = self.max_throughput.max(record.throughput);
            }
            Outcome::Error => {
                self.error_count += 1;
                self.total_error_duration += record.duration;
            }
        }

        Ok(())
    }

    /// Merges another accumulator of the same bucket into this one.
    ///
    /// Extrema merge pairwise, counters and sums add up. The result equals
    /// folding both accumulators' records sequentially.
    pub fn merge(&mut self, other: &Self) {
        debug_assert_eq!(
            self.bucket, other.bucket,
            "can only merge stats of the same bucket",
        );

        self.min_timestamp = self.min_timestamp.min(other.min_timestamp);
        self.max_timestamp = self.max_timestamp.max(other.max_timestamp);
        self.success_count += other.success_count;
        self.error_count += other.error_count;
        self.total_duration += other.total_duration;
        self.total_throughput += other.total_throughput;
        self.total_error_duration += other.total_error_duration;
        self.min_duration = self.min_duration.min(other.min_duration);
        self.max_duration = self.max_duration.max(other.max_duration);
        self.min_throughput = self.min_throughput.min(other.min_throughput);
        self.max_throughput = self.max_throughput.max(other.max_throughput);
    }

    /// The bucket this accumulator belongs to.
    #[must_use]
    pub fn bucket(&self) -> Timestamp {
        self.bucket
    }

    /// Returns `true` if no record has been folded in yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.success_count == 0 && self.error_count == 0
    }

    /// Earliest record timestamp seen.
    #[must_use]
    pub fn min_timestamp(&self) -> Timestamp {
        self.min_timestamp
    }

    /// Latest record timestamp seen.
    #[must_use]
    pub fn max_timestamp(&self) -> Timestamp {
        self.max_timestamp
    }

    /// Number of success records.
    #[must_use]
    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    /// Number of error records.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Summed duration of success records, in milliseconds.
    #[must_use]
    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    /// Summed throughput of success records.
    #[must_use]
    pub fn total_throughput(&self) -> Value {
        self.total_throughput
    }

    /// Summed duration of error records, in milliseconds.
    #[must_use]
    pub fn total_error_duration(&self) -> u64 {
        self.total_error_duration
    }

    /// Shortest success duration, in milliseconds.
    #[must_use]
    pub fn min_duration(&self) -> u64 {
        self.min_duration
    }

    /// Longest success duration, in milliseconds.
    #[must_use]
    pub fn max_duration(&self) -> u64 {
        self.max_duration
    }

    /// Lowest success throughput.
    #[must_use]
    pub fn min_throughput(&self) -> Value {
        self.min_throughput
    }

    /// Highest success throughput.
    #[must_use]
    pub fn max_throughput(&self) -> Value {
        self.max_throughput
    }

    /// Elapsed time between the earliest and latest record seen.
    ///
    /// Zero while the accumulator is empty.
    #[must_use]
    pub fn wall_clock(&self) -> TimeDelta {
        if self.is_empty() {
            return TimeDelta::zero();
        }
        self.max_timestamp - self.min_timestamp
    }

    /// Ratio of summed success duration to the bucket's wall clock.
    ///
    /// A sampling density indicator: how much of the observed time span was
    /// spent measuring. The wall clock counts fractional milliseconds, so a
    /// span under a millisecond is not truncated away. Zero when the wall
    /// clock is zero.
    #[must_use]
    pub fn fitness(&self) -> Value {
        let wall_clock = self.wall_clock();
        if wall_clock.is_zero() {
            return 0.0;
        }

        let wall_clock_ms = wall_clock.num_seconds() as Value * 1_000.0
            + wall_clock.subsec_nanos() as Value / 1_000_000.0;

        self.total_duration as Value / wall_clock_ms
    }

    /// Average duration of success records, in milliseconds.
    ///
    /// Zero when the bucket has no success records.
    #[must_use]
    pub fn avg_duration(&self) -> Value {
        if self.success_count == 0 {
            return 0.0;
        }
        self.total_duration as Value / self.success_count as Value
    }

    /// Average throughput of success records.
    ///
    /// Zero when the bucket has no success records.
    #[must_use]
    pub fn avg_throughput(&self) -> Value {
        if self.success_count == 0 {
            return 0.0;
        }
        self.total_throughput / self.success_count as Value
    }

    /// Fraction of records that were errors.
    ///
    /// Zero when the bucket is empty.
    #[must_use]
    pub fn avg_error_rate(&self) -> Value {
        let total = self.error_count + self.success_count;
        if total == 0 {
            return 0.0;
        }
        self.error_count as Value / total as Value
    }

    /// Average duration of error records, in milliseconds.
    ///
    /// Zero when the bucket has no error records.
    #[must_use]
    pub fn avg_error_duration(&self) -> Value {
        if self.error_count == 0 {
            return 0.0;
        }
        self.total_error_duration as Value / self.error_count as Value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::Rng;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_from_rfc3339(s).unwrap()
    }

    fn bucket() -> Timestamp {
        ts("2024-05-01T10:00:00+00:00")
    }

    #[test_log::test]
    fn add_success_updates_success_side() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());

        stats.add(&Record::new(ts("2024-05-01T10:15:00+00:00"), 120, 10.0, None))?;
        stats.add(&Record::new(ts("2024-05-01T10:20:00+00:00"), 80, 12.5, None))?;

        assert_eq!(2, stats.success_count());
        assert_eq!(0, stats.error_count());
        assert_eq!(200, stats.total_duration());
        assert_eq!(22.5, stats.total_throughput());
        assert_eq!(0, stats.total_error_duration());
        assert_eq!(80, stats.min_duration());
        assert_eq!(120, stats.max_duration());
        assert_eq!(10.0, stats.min_throughput());
        assert_eq!(12.5, stats.max_throughput());
        assert_eq!(ts("2024-05-01T10:15:00+00:00"), stats.min_timestamp());
        assert_eq!(ts("2024-05-01T10:20:00+00:00"), stats.max_timestamp());

        Ok(())
    }

    #[test_log::test]
    fn add_error_updates_error_side() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());

        stats.add(&Record::new(
            ts("2024-05-01T10:05:00+00:00"),
            50,
            -1.0,
            Some("timeout".into()),
        ))?;

        assert_eq!(0, stats.success_count());
        assert_eq!(1, stats.error_count());
        assert_eq!(0, stats.total_duration());
        assert_eq!(0.0, stats.total_throughput());
        assert_eq!(50, stats.total_error_duration());

        // success extrema stay at their sentinels
        assert_eq!(u64::MAX, stats.min_duration());
        assert_eq!(0, stats.max_duration());
        assert_eq!(Value::MAX, stats.min_throughput());
        assert_eq!(0.0, stats.max_throughput());

        // timestamp extrema cover error records too
        assert_eq!(ts("2024-05-01T10:05:00+00:00"), stats.min_timestamp());
        assert_eq!(ts("2024-05-01T10:05:00+00:00"), stats.max_timestamp());

        Ok(())
    }

    #[test_log::test]
    fn add_invalid_leaves_stats_untouched() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());
        stats.add(&Record::new(ts("2024-05-01T10:15:00+00:00"), 120, 10.0, None))?;

        let snapshot = stats.clone();

        let invalid = Record::new(ts("2024-05-01T10:50:00+00:00"), 50, -1.0, None);
        assert_eq!(
            Err(RecordError::ErrorWithoutMessage),
            stats.add(&invalid),
        );

        // timestamp extrema in particular must not move
        assert_eq!(snapshot, stats);

        Ok(())
    }

    #[test_log::test]
    fn empty_bucket_reports_sentinels_and_zero_metrics() {
        let stats = BucketStats::new(bucket());

        assert!(stats.is_empty());
        assert_eq!(TimeDelta::zero(), stats.wall_clock());
        assert_eq!(0.0, stats.fitness());
        assert_eq!(0.0, stats.avg_duration());
        assert_eq!(0.0, stats.avg_throughput());
        assert_eq!(0.0, stats.avg_error_rate());
        assert_eq!(0.0, stats.avg_error_duration());
        assert_eq!(u64::MAX, stats.min_duration());
        assert_eq!(0, stats.max_duration());
        assert_eq!(Value::MAX, stats.min_throughput());
        assert_eq!(0.0, stats.max_throughput());
    }

    #[test_log::test]
    fn single_record_spans_zero_wall_clock() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());
        stats.add(&Record::new(ts("2024-05-01T10:15:00+00:00"), 120, 10.0, None))?;

        assert_eq!(stats.min_timestamp(), stats.max_timestamp());
        assert_eq!(TimeDelta::zero(), stats.wall_clock());
        assert_eq!(0.0, stats.fitness());

        Ok(())
    }

    #[test_log::test]
    fn fitness_keeps_fractional_milliseconds() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());
        stats.add(&Record::new(ts("2024-05-01T10:00:00+00:00"), 1, 1.0, None))?;
        stats.add(&Record::new(ts("2024-05-01T10:00:00.00025+00:00"), 1, 1.0, None))?;

        // 2ms measured across a quarter-millisecond span
        assert_eq!(8.0, stats.fitness());

        let mut stats = BucketStats::new(bucket());
        stats.add(&Record::new(ts("2024-05-01T10:00:00+00:00"), 1, 1.0, None))?;
        stats.add(&Record::new(ts("2024-05-01T10:00:00.0025+00:00"), 4, 1.0, None))?;

        // 5ms measured across 2.5ms, not a truncated 2
        assert_eq!(2.0, stats.fitness());

        Ok(())
    }

    #[test_log::test]
    fn derived_metrics() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());

        for (minute, duration, throughput) in
            [(5, 100, 10.0), (15, 120, 12.5), (25, 90, 9.0), (35, 110, 11.0)]
        {
            stats.add(&Record::new(
                ts(&format!("2024-05-01T10:{minute:02}:00+00:00")),
                duration,
                throughput,
                None,
            ))?;
        }
        stats.add(&Record::new(
            ts("2024-05-01T10:45:00+00:00"),
            50,
            -1.0,
            Some("connection reset".into()),
        ))?;

        assert_eq!(105.0, stats.avg_duration());
        assert_eq!(42.5 / 4.0, stats.avg_throughput());
        assert_eq!(0.2, stats.avg_error_rate());
        assert_eq!(50.0, stats.avg_error_duration());

        // 420ms measured across a 40min span
        assert_eq!(TimeDelta::minutes(40), stats.wall_clock());
        assert_eq!(420.0 / 2_400_000.0, stats.fitness());

        Ok(())
    }

    #[test_log::test]
    fn error_only_bucket() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());

        stats.add(&Record::new(
            ts("2024-05-01T10:10:00+00:00"),
            40,
            -1.0,
            Some("timeout".into()),
        ))?;
        stats.add(&Record::new(
            ts("2024-05-01T10:30:00+00:00"),
            60,
            -1.0,
            Some("timeout".into()),
        ))?;

        assert_eq!(1.0, stats.avg_error_rate());
        assert_eq!(50.0, stats.avg_error_duration());
        assert_eq!(0.0, stats.avg_duration());
        assert_eq!(0.0, stats.avg_throughput());
        assert_eq!(TimeDelta::minutes(20), stats.wall_clock());
        assert_eq!(0.0, stats.fitness());

        Ok(())
    }

    #[test_log::test]
    fn merge_identity() -> crate::Result<()> {
        let mut stats = BucketStats::new(bucket());
        stats.add(&Record::new(ts("2024-05-01T10:15:00+00:00"), 120, 10.0, None))?;

        let mut merged = stats.clone();
        merged.merge(&BucketStats::new(bucket()));
        assert_eq!(stats, merged);

        let mut identity = BucketStats::new(bucket());
        identity.merge(&stats);
        assert_eq!(stats, identity);

        Ok(())
    }

    #[test_log::test]
    fn merge_matches_sequential_fold() {
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let records = (0..rng.gen_range(1..64))
                .map(|_| {
                    let minute = rng.gen_range(0..60);
                    let timestamp = ts(&format!("2024-05-01T10:{minute:02}:00+00:00"));
                    let duration = rng.gen_range(1..1_000);

                    if rng.gen_bool(0.2) {
                        Record::new(timestamp, duration, -1.0, Some("boom".into()))
                    } else {
                        // quarters stay exactly representable under summation
                        let throughput = rng.gen_range(0..400) as Value * 0.25;
                        Record::new(timestamp, duration, throughput, None)
                    }
                })
                .collect::<Vec<_>>();

            let mut sequential = BucketStats::new(bucket());
            for record in &records {
                sequential.add(record).unwrap();
            }

            let (left, right) = records.split_at(rng.gen_range(0..=records.len()));

            let mut a = BucketStats::new(bucket());
            for record in left {
                a.add(record).unwrap();
            }

            let mut b = BucketStats::new(bucket());
            for record in right {
                b.add(record).unwrap();
            }

            let mut ab = a.clone();
            ab.merge(&b);
            assert_eq!(sequential, ab);

            let mut ba = b.clone();
            ba.merge(&a);
            assert_eq!(sequential, ba);
        }
    }
}
