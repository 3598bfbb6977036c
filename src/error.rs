//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable Photos database file. Fatal: nothing else can run.
    #[error("could not find Photos database at {}", .0.display())]
    PathResolution(PathBuf),

    /// The Z_METADATA row or its plist blob is missing or malformed.
    #[error("could not read library metadata: {0}")]
    SchemaUnreadable(String),

    /// The uuid matches no asset in this library.
    #[error("no asset matches uuid {0}")]
    RecordNotFound(String),

    /// The retry budget was spent without a successful write.
    #[error("update failed after {attempts} attempts: {source}")]
    UpdateExhausted {
        attempts: u32,
        #[source]
        source: rusqlite::Error,
    },

    /// Offset outside the valid UTC±14 range.
    #[error("timezone offset {0} seconds is out of range")]
    InvalidOffset(i32),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
