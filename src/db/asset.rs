//! Asset row lookup.

use rusqlite::{params, Connection};

use super::version::SchemaVersion;
use crate::error::Error;

/// One asset's attribute row as currently stored.
///
/// `tz_offset` and `tz_name` are NULL in real libraries for assets whose
/// capture device never reported a timezone.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub pk: i64,
    pub counter: i64,
    pub tz_offset: Option<i32>,
    pub tz_name: Option<String>,
}

/// Fetch the attributes row for an asset by its external uuid.
///
/// Joins `ZADDITIONALASSETATTRIBUTES` to the generation-specific asset
/// table. The uuid is bound as a parameter, never interpolated; the table
/// name comes from the closed set in [`SchemaVersion`]. Should the uuid
/// ever match more than one row, the lowest attributes primary key wins.
pub fn locate(conn: &Connection, schema: &SchemaVersion, uuid: &str) -> Result<AssetRecord, Error> {
    let asset_table = schema.asset_table();
    let sql = format!(
        "SELECT ZADDITIONALASSETATTRIBUTES.Z_PK,
                ZADDITIONALASSETATTRIBUTES.Z_OPT,
                ZADDITIONALASSETATTRIBUTES.ZTIMEZONEOFFSET,
                ZADDITIONALASSETATTRIBUTES.ZTIMEZONENAME
         FROM ZADDITIONALASSETATTRIBUTES
         JOIN {asset_table} ON ZADDITIONALASSETATTRIBUTES.ZASSET = {asset_table}.Z_PK
         WHERE {asset_table}.ZUUID = ?1
         ORDER BY ZADDITIONALASSETATTRIBUTES.Z_PK
         LIMIT 1"
    );

    let result = conn.query_row(&sql, params![uuid], |row| {
        Ok(AssetRecord {
            pk: row.get(0)?,
            counter: row.get(1)?,
            tz_offset: row.get(2)?,
            tz_name: row.get(3)?,
        })
    });

    match result {
        Ok(record) => Ok(record),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::RecordNotFound(uuid.to_string())),
        Err(e) => Err(e.into()),
    }
}
