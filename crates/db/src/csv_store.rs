// crates/db/src/csv_store.rs
//! Flat-file snapshot of the datastore in the legacy CSV layout.
//!
//! Early releases persisted everything to two CSV files before SQLite took
//! over. The layout is kept readable by this module so old data can be
//! imported and current data exported for backup:
//!
//! - events: header `timestamp`, one RFC 3339 instant per row
//! - settings: header `brand,tar,nicotine`, a single data row, with the
//!   empty string standing in for numeric fields the user never filled

use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use kemuri_core::{CigaretteSettings, SmokingEvent};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("Invalid numeric field '{0}'")]
    Numeric(String),

    #[error("Missing or wrong header, expected {0:?}")]
    Header(&'static [&'static str]),
}

pub type CsvResult<T> = Result<T, CsvError>;

const EVENTS_HEADER: &[&str] = &["timestamp"];
const SETTINGS_HEADER: &[&str] = &["brand", "tar", "nicotine"];

/// Write events as the legacy single-column file, newest-first order
/// preserved from the caller.
pub fn write_events<W: Write>(writer: W, events: &[SmokingEvent]) -> CsvResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EVENTS_HEADER)?;
    for event in events {
        out.write_record([event.timestamp.to_rfc3339()])?;
    }
    out.flush()?;
    Ok(())
}

/// Read event timestamps from the legacy file.
pub fn read_events<R: Read>(reader: R) -> CsvResult<Vec<DateTime<Utc>>> {
    let mut input = csv::Reader::from_reader(reader);
    if *input.headers()? != *EVENTS_HEADER {
        return Err(CsvError::Header(EVENTS_HEADER));
    }
    let mut timestamps = Vec::new();
    for record in input.records() {
        let record = record?;
        let raw = record.get(0).unwrap_or_default();
        let ts = DateTime::parse_from_rfc3339(raw).map_err(|source| CsvError::Timestamp {
            value: raw.to_string(),
            source,
        })?;
        timestamps.push(ts.with_timezone(&Utc));
    }
    Ok(timestamps)
}

/// Write the latest settings row in the legacy layout.
pub fn write_settings<W: Write>(writer: W, settings: &CigaretteSettings) -> CsvResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(SETTINGS_HEADER)?;
    out.write_record([
        settings.brand.clone(),
        settings.tar.to_string(),
        settings.nicotine.to_string(),
    ])?;
    out.flush()?;
    Ok(())
}

/// Read the single settings row. Returns `None` for a header-only file.
/// Empty numeric fields decode as 0, matching how the legacy writer left
/// them blank.
pub fn read_settings<R: Read>(reader: R) -> CsvResult<Option<(String, f64, f64)>> {
    let mut input = csv::Reader::from_reader(reader);
    if *input.headers()? != *SETTINGS_HEADER {
        return Err(CsvError::Header(SETTINGS_HEADER));
    }
    let Some(record) = input.records().next() else {
        return Ok(None);
    };
    let record = record?;
    let brand = record.get(0).unwrap_or_default().to_string();
    let tar = parse_numeric(record.get(1).unwrap_or_default())?;
    let nicotine = parse_numeric(record.get(2).unwrap_or_default())?;
    Ok(Some((brand, tar, nicotine)))
}

fn parse_numeric(raw: &str) -> CsvResult<f64> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse()
        .map_err(|_| CsvError::Numeric(raw.to_string()))
}

/// Export events to a file path (backup helper).
pub fn export_events_to_path(path: &Path, events: &[SmokingEvent]) -> CsvResult<()> {
    write_events(std::fs::File::create(path)?, events)
}

/// Import event timestamps from a file path.
pub fn import_events_from_path(path: &Path) -> CsvResult<Vec<DateTime<Utc>>> {
    read_events(std::fs::File::open(path)?)
}
