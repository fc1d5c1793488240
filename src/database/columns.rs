//! Column codecs shared by the repositories.
//!
//! Timestamps are stored as integer microseconds since the Unix epoch and
//! amounts as integer minor units.

use jiff::Timestamp;
use sqlx::{Row, sqlite::SqliteRow};

pub(crate) fn encode_timestamp(timestamp: Timestamp) -> i64 {
    timestamp.as_microsecond()
}

pub(crate) fn try_get_timestamp(row: &SqliteRow, col: &str) -> Result<Timestamp, sqlx::Error> {
    let micros: i64 = row.try_get(col)?;

    decode_timestamp(col, micros)
}

pub(crate) fn try_get_optional_timestamp(
    row: &SqliteRow,
    col: &str,
) -> Result<Option<Timestamp>, sqlx::Error> {
    let micros: Option<i64> = row.try_get(col)?;

    micros.map(|micros| decode_timestamp(col, micros)).transpose()
}

fn decode_timestamp(col: &str, micros: i64) -> Result<Timestamp, sqlx::Error> {
    Timestamp::from_microsecond(micros).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn encode_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(crate) fn try_get_amount(row: &SqliteRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_quantity(row: &SqliteRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity_i64: i64 = row.try_get(col)?;

    u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
