//! CSV input for OHLCV series.
//!
//! Accepts the column layout of common provider exports
//! (`Date,Open,High,Low,Close,Volume[,Dividends,Stock Splits]`) as well as
//! lower-case headers with an integer `open_time`. Unknown columns are
//! ignored.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{Bar, OhlcvSeries, Timestamp, error::Error};

/// Errors raised while loading a series from CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unrecognised time value {value:?}")]
    Time { row: usize, value: String },

    #[error(transparent)]
    Series(#[from] Error),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Datetime",
        alias = "open_time",
        alias = "timestamp"
    )]
    time: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Loads and validates a series from the CSV file at `path`.
///
/// # Errors
///
/// [`LoadError`] on I/O, parse or validation failure.
pub fn load_csv(path: impl AsRef<Path>) -> Result<OhlcvSeries, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "loading OHLCV CSV");
    read_csv(BufReader::new(file))
}

/// Reads and validates a series from any CSV source with a header row.
///
/// Time values may be integers (taken as-is), ISO dates (`2024-01-31`),
/// or date-times with an offset (RFC 3339 or `2024-01-31 00:00:00-05:00`).
/// Dates and date-times become epoch milliseconds.
///
/// # Errors
///
/// [`LoadError`] on parse or validation failure.
///
/// # Example
///
/// ```
/// use ta_commentary::loader::read_csv;
///
/// let csv = "\
/// Date,Open,High,Low,Close,Volume,Dividends
/// 2024-01-02,10.0,11.0,9.5,10.5,1200,0
/// 2024-01-03,10.5,11.5,10.0,11.0,900,0
/// ";
///
/// let series = read_csv(csv.as_bytes()).unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.latest().close, 11.0);
/// ```
pub fn read_csv<R: Read>(reader: R) -> Result<OhlcvSeries, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let bars = rdr
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(row, record)| {
            let record = record?;
            let open_time = parse_time(&record.time).ok_or_else(|| LoadError::Time {
                row,
                value: record.time.clone(),
            })?;

            Ok(Bar {
                open_time,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    debug!(bars = bars.len(), "parsed OHLCV rows");
    Ok(OhlcvSeries::new(bars)?)
}

fn parse_time(value: &str) -> Option<Timestamp> {
    if let Ok(raw) = value.parse::<Timestamp>() {
        return Some(raw);
    }

    let millis = if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()
    } else if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        time.timestamp_millis()
    } else {
        DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z")
            .ok()?
            .timestamp_millis()
    };

    Timestamp::try_from(millis).ok()
}
