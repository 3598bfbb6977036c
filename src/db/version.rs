//! Photos schema generation detection.
//!
//! Photos renamed its primary asset table between major releases. The
//! `Z_METADATA` table carries a binary plist whose `PLModelVersion` key
//! identifies the schema generation; that selects the table name every
//! later query uses.

use rusqlite::Connection;

use crate::error::Error;

/// Inclusive `PLModelVersion` ranges per supported Photos release.
const PHOTOS_5_MODEL_VERSION: (i64, i64) = (13_000, 14_999);
const PHOTOS_6_MODEL_VERSION: (i64, i64) = (15_000, 16_999);
const PHOTOS_7_MODEL_VERSION: (i64, i64) = (17_000, 18_999);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Photos5,
    Photos6,
    Photos7,
}

impl Generation {
    /// Name of the primary asset table for this generation.
    pub fn asset_table(self) -> &'static str {
        match self {
            Generation::Photos5 => "ZGENERICASSET",
            Generation::Photos6 | Generation::Photos7 => "ZASSET",
        }
    }
}

/// Outcome of classifying a library's model version.
///
/// `confirmed` is false when the model version matched no known range and
/// the newest generation was assumed. Callers that care (and tests) can
/// tell the guess apart from a real match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub generation: Generation,
    pub model_version: i64,
    pub confirmed: bool,
}

impl SchemaVersion {
    pub fn asset_table(&self) -> &'static str {
        self.generation.asset_table()
    }
}

/// Read `PLModelVersion` from the metadata row with the highest `Z_VERSION`.
pub fn model_version(conn: &Connection) -> Result<i64, Error> {
    let blob: Vec<u8> = conn
        .query_row(
            "SELECT Z_PLIST FROM Z_METADATA ORDER BY Z_VERSION DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .map_err(|e| Error::SchemaUnreadable(format!("Z_METADATA query failed: {e}")))?;

    let value = plist::Value::from_reader(std::io::Cursor::new(blob))
        .map_err(|e| Error::SchemaUnreadable(format!("Z_PLIST is not a valid plist: {e}")))?;

    value
        .as_dictionary()
        .and_then(|dict| dict.get("PLModelVersion"))
        .and_then(|v| v.as_signed_integer())
        .ok_or_else(|| Error::SchemaUnreadable("Z_PLIST has no PLModelVersion key".into()))
}

/// Classify a model version into a schema generation.
///
/// Ranges are checked oldest to newest; the first match wins. A version
/// outside every range assumes the newest generation so that libraries
/// written by a Photos release newer than this crate still work.
pub fn classify(model_version: i64) -> SchemaVersion {
    let ranges = [
        (PHOTOS_5_MODEL_VERSION, Generation::Photos5),
        (PHOTOS_6_MODEL_VERSION, Generation::Photos6),
        (PHOTOS_7_MODEL_VERSION, Generation::Photos7),
    ];
    for ((lo, hi), generation) in ranges {
        if (lo..=hi).contains(&model_version) {
            return SchemaVersion {
                generation,
                model_version,
                confirmed: true,
            };
        }
    }
    SchemaVersion {
        generation: Generation::Photos7,
        model_version,
        confirmed: false,
    }
}

/// Resolve the schema generation for an open database.
pub fn resolve(conn: &Connection) -> Result<SchemaVersion, Error> {
    let version = model_version(conn)?;
    let schema = classify(version);
    if !schema.confirmed {
        tracing::warn!(
            model_version = version,
            "unknown Photos model version, assuming newest supported schema"
        );
    }
    Ok(schema)
}
