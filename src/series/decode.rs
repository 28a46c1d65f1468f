use chrono::TimeZone;
use csv::{ReaderBuilder, StringRecord, Trim};

use super::time::{parse_instant, parse_lenient_f64};
use super::{SeriesPoint, TimeSeries};

/// Column layout of a sensor log row:
/// `timestamp, <sensor name>, temperature, humidity[, lux[, tds]]`
const COL_TIME: usize = 0;
const COL_TEMPERATURE: usize = 2;
const COL_HUMIDITY: usize = 3;
const COL_LUX: usize = 4;
const COL_TDS: usize = 5;

/// Decode a sensor log body into a time series.
///
/// Rows are independent: a row with fewer than two fields or an unreadable
/// timestamp is skipped, and an unreadable numeric field becomes `None`
/// without affecting the rest of the row. Blank lines are ignored.
pub fn decode_log<Tz: TimeZone>(body: &str, tz: &Tz) -> TimeSeries {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        // The logger writes fields unescaped; a stray quote must stay inside its row
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => match decode_row(&record, tz) {
                Some(point) => points.push(point),
                None => skipped += 1,
            },
            Err(e) => {
                tracing::debug!(line, error = %e, "Skipping unreadable log row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(rows = points.len(), skipped, "Decoded sensor log");
    }

    TimeSeries::new(points)
}

/// The last `n` non-blank lines of a log body, without decoding anything.
#[must_use]
pub fn tail_rows(body: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }

    let body = body.trim_end();
    let mut count = 0;
    let mut line_end = body.len();
    for (idx, _) in body.rmatch_indices('\n') {
        if !body[idx + 1..line_end].trim().is_empty() {
            count += 1;
            if count == n {
                return &body[idx + 1..];
            }
        }
        line_end = idx;
    }
    body
}

/// Decode one row; `None` when the row has no usable timestamp.
pub fn decode_row<Tz: TimeZone>(record: &StringRecord, tz: &Tz) -> Option<SeriesPoint> {
    if record.len() < 2 {
        return None;
    }

    let timestamp = parse_instant(record.get(COL_TIME)?, tz)?;
    let field = |idx: usize| record.get(idx).and_then(parse_lenient_f64);

    Some(SeriesPoint {
        timestamp,
        temperature: field(COL_TEMPERATURE),
        humidity: field(COL_HUMIDITY),
        lux: field(COL_LUX),
        tds: field(COL_TDS),
    })
}
