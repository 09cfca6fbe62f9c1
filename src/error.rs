use std::path::PathBuf;
use thiserror::Error;

/// The log source could not be used. No part of it is ingested when this is
/// returned.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Log file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read log file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log file {} is empty, expected header line", .path.display())]
    MissingHeader { path: PathBuf },

    #[error("Log file {} has header {found:?}, expected {expected:?}", .path.display(), expected = crate::record::HEADER)]
    HeaderMismatch { path: PathBuf, found: String },
}
