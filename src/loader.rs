use csv::{StringRecord, StringRecordsIntoIter};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::SourceError;
use crate::record::{is_header, log_reader};

/// Lazily read data rows of an access log whose header has been checked.
pub struct LogLines<R = File> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> Iterator for LogLines<R> {
    type Item = csv::Result<StringRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}

/// Open `path` and check its first line against the header. Nothing past the
/// header is read until the returned iterator is driven.
pub fn open_log(path: &Path) -> Result<LogLines, SourceError> {
    let start_time = Instant::now();
    info!(action = "start", component = "log_loader", file_path = ?path, "Opening access log");

    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let lines = from_reader(path, file)?;

    info!(
        action = "complete",
        component = "log_loader",
        file_path = ?path,
        duration_ms = start_time.elapsed().as_millis(),
        "Access log header verified"
    );
    Ok(lines)
}

/// Header check over any reader; `path` is only used for errors.
pub fn from_reader<R: Read>(path: &Path, source: R) -> Result<LogLines<R>, SourceError> {
    let mut reader = log_reader(source);
    let mut header = StringRecord::new();

    let found = reader
        .read_record(&mut header)
        .map_err(|e| SourceError::Unreadable {
            path: path.to_path_buf(),
            source: io::Error::from(e),
        })?;

    if !found {
        return Err(SourceError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    if !is_header(&header) {
        return Err(SourceError::HeaderMismatch {
            path: path.to_path_buf(),
            found: header.iter().collect::<Vec<_>>().join(","),
        });
    }

    Ok(LogLines {
        records: reader.into_records(),
    })
}
