//! Loads measurement records from tab-separated files.

use crate::record::Record;
use crate::{Error, Timestamp, Value};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Lists the files a run should process.
///
/// A file path is returned as-is. For a directory, returns the `*.tsv`
/// files directly inside it (no recursion), sorted by name so runs are
/// deterministic.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover<P: AsRef<Path>>(path: P) -> crate::Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();

    for dirent in std::fs::read_dir(path)? {
        let dirent = dirent?;
        let path = dirent.path();

        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"))
        {
            files.push(path);
        }
    }

    files.sort();

    Ok(files)
}

/// Dataset name of an input file: its stem.
#[must_use]
pub fn dataset_name(path: &Path) -> String {
    path.file_stem().map_or_else(
        || path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    )
}

/// Loads the records of one tab-separated file.
///
/// One record per non-blank line, at least three fields: timestamp,
/// duration (integer milliseconds), throughput (float). An optional fourth
/// field is the error message; a blank one counts as no message. Fields
/// past the fourth are ignored.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a line has fewer than
/// three fields, or a field does not parse. Parse errors name the
/// offending line verbatim.
pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Vec<Record>> {
    let path = path.as_ref();

    log::info!("Opening {}...", path.display());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);

        // NOTE: a whitespace-only line comes through as a single blank field
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let (Some(timestamp), Some(duration), Some(throughput)) =
            (row.get(0), row.get(1), row.get(2))
        else {
            return Err(Error::TruncatedLine {
                line,
                text: row.iter().collect::<Vec<_>>().join("\t"),
            });
        };

        let Some(timestamp) = parse_timestamp(timestamp) else {
            return Err(invalid_field("timestamp", line, &row));
        };

        let Ok(duration) = duration.trim().parse::<u64>() else {
            return Err(invalid_field("duration", line, &row));
        };

        let Ok(throughput) = throughput.trim().parse::<Value>() else {
            return Err(invalid_field("throughput", line, &row));
        };

        let message = row
            .get(3)
            .filter(|msg| !msg.trim().is_empty())
            .map(ToOwned::to_owned);

        records.push(Record::new(timestamp, duration, throughput, message));
    }

    log::debug!("loaded {} record(s) from {}", records.len(), path.display());

    Ok(records)
}

/// Parses a record timestamp.
///
/// RFC 3339 first; timestamps without an offset (`T`- or space-separated)
/// are taken as UTC.
fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();

    if let Ok(ts) = Timestamp::parse_from_rfc3339(s) {
        return Some(ts);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

fn invalid_field(field: &'static str, line: u64, row: &csv::StringRecord) -> Error {
    Error::InvalidField {
        field,
        line,
        text: row.iter().collect::<Vec<_>>().join("\t"),
    }
}
