// src/repositories/columns.rs
//
// Column codecs shared by the SQLite repositories
//
// Decimals are stored as text and enums by name; a value that does not parse
// is an explicit conversion error, never a silent default.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::str::FromStr;

fn conversion_error(
    idx: usize,
    column: &str,
    value: &str,
    reason: impl std::fmt::Display,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Invalid {} '{}': {}", column, value, reason),
        )),
    )
}

fn parse_text<T>(row: &Row, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let idx = row.as_ref().column_index(column)?;
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| conversion_error(idx, column, &raw, e))
}

/// Decimal stored as text
pub(crate) fn decimal(row: &Row, column: &str) -> rusqlite::Result<Decimal> {
    parse_text(row, column)
}

/// Nullable decimal stored as text
pub(crate) fn optional_decimal(row: &Row, column: &str) -> rusqlite::Result<Option<Decimal>> {
    let idx = row.as_ref().column_index(column)?;
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        Decimal::from_str(&s).map_err(|e| conversion_error(idx, column, &s, e))
    })
    .transpose()
}

/// Enum stored by its upper-case name
pub(crate) fn named<T>(row: &Row, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_text(row, column)
}

pub(crate) fn timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let idx = row.as_ref().column_index(column)?;
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, column, &raw, e))
}

/// Fixed-width UTC form so that text ordering matches time ordering
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
