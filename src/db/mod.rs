//! Access to the Photos library database.
//!
//! A session opens `Photos.sqlite` once, resolves the schema generation
//! once, and reuses both for every query. The file belongs to Photos;
//! this crate is a guest in it.

mod asset;
mod update;
mod version;

pub use asset::AssetRecord;
pub use update::{RetryPolicy, TimezoneUpdater, VerboseSink};
pub use version::{Generation, SchemaVersion};

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::Error;
use crate::timezone::offset_to_str;

/// Default Photos library bundle under the user's Pictures folder.
fn default_library_path() -> Option<PathBuf> {
    dirs::picture_dir().map(|p| p.join("Photos Library.photoslibrary"))
}

/// Resolve the `Photos.sqlite` path inside a library bundle.
///
/// Falls back to the default library location when no path is given.
pub fn photos_db_path(library: Option<&Path>) -> Result<PathBuf, Error> {
    let library = match library {
        Some(p) => p.to_path_buf(),
        None => default_library_path()
            .ok_or_else(|| Error::PathResolution(PathBuf::from("~/Pictures")))?,
    };
    let db_path = library.join("database").join("Photos.sqlite");
    if !db_path.is_file() {
        return Err(Error::PathResolution(db_path));
    }
    Ok(db_path)
}

/// An open session against one Photos library.
pub struct PhotosDb {
    conn: Connection,
    schema: SchemaVersion,
    db_path: PathBuf,
}

impl PhotosDb {
    /// Open the library at `library`, or the default library when `None`.
    pub fn open(library: Option<&Path>) -> Result<Self, Error> {
        let db_path = photos_db_path(library)?;
        Self::open_db_file(&db_path)
    }

    /// Open a `Photos.sqlite` file directly.
    pub fn open_db_file(db_path: &Path) -> Result<Self, Error> {
        if !db_path.is_file() {
            return Err(Error::PathResolution(db_path.to_path_buf()));
        }
        let conn = Connection::open(db_path)?;
        let schema = version::resolve(&conn)?;
        tracing::debug!(
            path = %db_path.display(),
            generation = ?schema.generation,
            confirmed = schema.confirmed,
            "opened Photos database"
        );
        Ok(Self {
            conn,
            schema,
            db_path: db_path.to_path_buf(),
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn schema(&self) -> &SchemaVersion {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Current timezone of an asset: (offset seconds, `+HHMM` string, name).
    ///
    /// Assets whose device never reported a timezone have NULL columns;
    /// those read back as offset 0 and an empty name.
    pub fn get_timezone(&self, uuid: &str) -> Result<(i32, String, String), Error> {
        let record = self.locate(uuid)?;
        let offset = record.tz_offset.unwrap_or(0);
        Ok((
            offset,
            offset_to_str(offset),
            record.tz_name.unwrap_or_default(),
        ))
    }

    /// Fetch the raw attributes row for an asset.
    pub fn locate(&self, uuid: &str) -> Result<AssetRecord, Error> {
        asset::locate(&self.conn, &self.schema, uuid)
    }
}
