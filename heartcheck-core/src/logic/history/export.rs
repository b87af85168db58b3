//! CSV export of the session history
//!
//! Header matches the `HistoryEntry` field names. Confidence is written
//! with two decimals; other numbers use their shortest exact form so the
//! export parses back to the same values.

use chrono::NaiveDateTime;

use crate::constants::TIMESTAMP_FORMAT;
use crate::logic::tabular::{parse_records, write_record};
use super::{HistoryEntry, HistoryError};

/// Column names, in order
pub const HISTORY_COLUMNS: [&str; 8] = [
    "timestamp", "label", "confidence", "age", "sex", "trestbps", "chol", "thalach",
];

/// Serialize entries (already most-recent-first) as UTF-8 CSV
pub fn to_csv(entries: &[HistoryEntry]) -> Vec<u8> {
    let mut out = String::new();
    write_record(&mut out, &HISTORY_COLUMNS);

    for entry in entries {
        write_record(
            &mut out,
            &[
                entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                entry.label.to_string(),
                format!("{:.2}", entry.confidence),
                entry.age.to_string(),
                entry.sex.to_string(),
                entry.trestbps.to_string(),
                entry.chol.to_string(),
                entry.thalach.to_string(),
            ],
        );
    }

    out.into_bytes()
}

/// Parse an export produced by `to_csv`, preserving row order
pub fn from_csv(bytes: &[u8]) -> Result<Vec<HistoryEntry>, HistoryError> {
    let text = std::str::from_utf8(bytes).map_err(|e| malformed(0, e.to_string()))?;
    let records = parse_records(text).map_err(|reason| malformed(0, reason))?;

    let mut rows = records.into_iter();
    match rows.next() {
        Some(header) if header.iter().map(String::as_str).eq(HISTORY_COLUMNS) => {}
        Some(header) => {
            return Err(malformed(1, format!("unexpected header: {}", header.join(","))));
        }
        None => return Err(malformed(1, "missing header row")),
    }

    rows.enumerate()
        .map(|(i, row)| parse_row(i + 2, &row))
        .collect()
}

fn parse_row(line: usize, row: &[String]) -> Result<HistoryEntry, HistoryError> {
    if row.len() != HISTORY_COLUMNS.len() {
        return Err(malformed(
            line,
            format!("expected {} fields, got {}", HISTORY_COLUMNS.len(), row.len()),
        ));
    }

    let number = |index: usize| -> Result<f64, HistoryError> {
        row[index].parse::<f64>().map_err(|e| {
            malformed(line, format!("{}: {}", HISTORY_COLUMNS[index], e))
        })
    };

    Ok(HistoryEntry {
        timestamp: NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT)
            .map_err(|e| malformed(line, format!("timestamp: {}", e)))?,
        label: row[1].parse().map_err(|e: String| malformed(line, e))?,
        confidence: number(2)?,
        age: number(3)?,
        sex: number(4)?,
        trestbps: number(5)?,
        chol: number(6)?,
        thalach: number(7)?,
    })
}

fn malformed(line: usize, reason: impl Into<String>) -> HistoryError {
    HistoryError::Malformed {
        line,
        reason: reason.into(),
    }
}
