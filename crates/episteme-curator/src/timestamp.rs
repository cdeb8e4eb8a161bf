//! Snapshot timestamp parsing
//!
//! Two encodings are accepted for the time of day: the usual `HH:MM:SS` and
//! the file-name-safe `HH-MM-SS`. The latter is normalized to the former
//! before parsing. Timestamps without an offset are taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// File-name-safe rendering used by the file store
const FILE_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.6f";

/// Rewrite a dashed time of day (`12-30-05`) into colon form (`12:30:05`)
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();
    let Some(split) = raw.find(['T', ' ']) else {
        return raw.to_string();
    };
    let (date, rest) = raw.split_at(split + 1);
    let time = rest.as_bytes();

    let dashed = time.len() >= 8
        && time[2] == b'-'
        && time[5] == b'-'
        && [0, 1, 3, 4, 6, 7].iter().all(|&i| time[i].is_ascii_digit());
    if !dashed {
        return raw.to_string();
    }

    format!("{}{}:{}:{}", date, &rest[..2], &rest[3..5], &rest[6..])
}

/// Parse a snapshot timestamp in either encoding
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = normalize(raw);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Timestamp portion of a snapshot file name, e.g. `snapshot_<ts>.json`
///
/// A trailing collision suffix (`snapshot_<ts>_1.json`) is dropped.
pub fn from_file_name<'a>(file_name: &'a str, prefix: &str) -> Option<&'a str> {
    let stem = file_name.strip_suffix(".json")?;
    let mut ts = stem.strip_prefix(prefix)?;
    if let Some((head, n)) = ts.rsplit_once('_') {
        if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) {
            ts = head;
        }
    }
    (!ts.is_empty()).then_some(ts)
}

/// File name for a snapshot taken at `at`
pub fn file_name_for(at: DateTime<Utc>, prefix: &str) -> String {
    format!("{}{}.json", prefix, at.format(FILE_FORMAT))
}
