//! Renders bucket statistics as tab-separated rows.

use crate::engine::BucketMap;
use crate::stats::BucketStats;
use std::io::Write;

/// Column header matching the row layout of [`write_dataset`].
pub const HEADER: &str = "Name\tDate\tMin_Date\tMax_Date\tWallClock\tFitness\tCount\tError_Count\tTotal_Duration\tTotal_Mbps\tTotal_ErrorDuration\tAvg_Duration\tAvg_Mbps\tAvg_Errors\tAvg_ErrorDuration\tMin_Duration\tMax_Duration\tMin_Mbps\tMax_Mbps";

/// Writes the column header line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_header<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{HEADER}")
}

/// Writes one row per bucket of a dataset, sorted by bucket key.
///
/// Rows are a pure projection of accumulator state: a bucket that never
/// saw a success record prints its sentinel duration and throughput
/// extrema.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_dataset<W: Write>(
    writer: &mut W,
    name: &str,
    buckets: &BucketMap,
) -> std::io::Result<()> {
    let mut sorted = buckets.values().collect::<Vec<_>>();
    sorted.sort_by_key(|stats| stats.bucket());

    for stats in sorted {
        write_row(writer, name, stats)?;
    }

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, name: &str, stats: &BucketStats) -> std::io::Result<()> {
    writeln!(
        writer,
        "{name}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.bucket().to_rfc3339(),
        stats.min_timestamp().to_rfc3339(),
        stats.max_timestamp().to_rfc3339(),
        stats.wall_clock().num_milliseconds(),
        stats.fitness(),
        stats.success_count(),
        stats.error_count(),
        stats.total_duration(),
        stats.total_throughput(),
        stats.total_error_duration(),
        stats.avg_duration(),
        stats.avg_throughput(),
        stats.avg_error_rate(),
        stats.avg_error_duration(),
        stats.min_duration(),
        stats.max_duration(),
        stats.min_throughput(),
        stats.max_throughput(),
    )
}
