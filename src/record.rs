use chrono::{DateTime, FixedOffset, NaiveDate};
use csv::StringRecord;
use std::borrow::Cow;
use std::io;
use thiserror::Error;

/// First line every access log must start with.
pub const HEADER: &str = "Path,User,Timestamp";

/// One validated row of the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub url: String,
    pub user_id: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl LogRecord {
    /// Calendar date in the record's own offset, not converted to UTC.
    pub fn event_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Why a row was dropped during ingestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("header line")]
    Header,

    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("timestamp {0:?} is not an ISO-8601 date-time with offset")]
    TimestampFormat(String),

    #[error("invalid timestamp: {0}")]
    Timestamp(#[source] chrono::ParseError),

    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// CSV reader with the access log's dialect: plain comma splitting, no
/// quoting, no header handling and a variable field count.
pub fn log_reader<R: io::Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

pub fn is_header(record: &StringRecord) -> bool {
    let expected = HEADER.split(',');
    record.len() == expected.clone().count()
        && record
            .iter()
            .zip(expected)
            .enumerate()
            .all(|(i, (field, name))| {
                let field = if i == 0 {
                    field.trim_start_matches('\u{feff}')
                } else {
                    field
                };
                field.eq_ignore_ascii_case(name)
            })
}

/// Validate one `url,user,timestamp` row.
pub fn parse_record(record: &StringRecord) -> Result<LogRecord, Rejection> {
    if is_header(record) {
        return Err(Rejection::Header);
    }

    let (url, user_id, timestamp) = match (record.get(0), record.get(1), record.get(2)) {
        (Some(url), Some(user_id), Some(timestamp)) if record.len() == 3 => {
            (url, user_id, timestamp)
        }
        _ => return Err(Rejection::FieldCount(record.len())),
    };

    Ok(LogRecord {
        url: url.to_string(),
        user_id: user_id.to_string(),
        timestamp: parse_timestamp(timestamp)?,
    })
}

/// Parse a single raw line.
pub fn parse_line(line: &str) -> Result<LogRecord, Rejection> {
    let mut record = StringRecord::new();
    let read = log_reader(line.as_bytes()).read_record(&mut record);
    match read {
        Ok(true) => parse_record(&record),
        Ok(false) => Err(Rejection::FieldCount(0)),
        Err(e) => Err(Rejection::Unreadable(e.to_string())),
    }
}

/// ISO-8601 date-time with a mandatory offset: `T` separator, seconds and
/// fraction optional, `Z` or `±hh:mm`, optionally followed by a `[Region]`.
/// The region is accepted but the explicit offset decides the date.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, Rejection> {
    let normalized =
        normalize_timestamp(raw).ok_or_else(|| Rejection::TimestampFormat(raw.to_string()))?;
    DateTime::parse_from_rfc3339(&normalized).map_err(Rejection::Timestamp)
}

fn normalize_timestamp(raw: &str) -> Option<Cow<'_, str>> {
    let value = match raw.strip_suffix(']') {
        Some(rest) => {
            let (value, region) = rest.split_once('[')?;
            let valid_region = !region.is_empty()
                && region
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-'));
            if !valid_region {
                return None;
            }
            value
        }
        None => raw,
    };

    // yyyy-mm-ddThh:mm is the shortest accepted prefix.
    let bytes = value.as_bytes();
    if bytes.len() < 16 || bytes[10] != b'T' || bytes[13] != b':' || value.ends_with('z') {
        return None;
    }

    if bytes[16..].first() == Some(&b':') {
        Some(Cow::Borrowed(value))
    } else {
        let (minutes, offset) = (value.get(..16)?, value.get(16..)?);
        Some(Cow::Owned(format!("{}:00{}", minutes, offset)))
    }
}
