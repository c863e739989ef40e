// src/db/migrations.rs
//
// Schema bootstrap and version tracking
//
// The schema ships as one script (schema.sql) tagged SCHEMA_VERSION. A fresh
// file gets the script; a file at any other version is refused rather than
// altered in place.

use log::{info, warn};
use rusqlite::{Connection, OptionalExtension};
use std::cmp::Ordering;

use crate::error::{AppError, AppResult};

/// Version written by schema.sql
const SCHEMA_VERSION: i32 = 1;

/// Bring a database file to SCHEMA_VERSION. Calling it again is a no-op.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let found = get_schema_version(conn)?;
    if found == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        info!("Created kitchen ledger schema v{}", SCHEMA_VERSION);
        return Ok(());
    }

    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(AppError::Storage(format!(
            "Database schema v{} predates v{} and has no upgrade path",
            found, SCHEMA_VERSION
        ))),
        Ordering::Greater => {
            warn!("Database schema v{} is newer than this build", found);
            Err(AppError::Storage(format!(
                "Database schema v{} is newer than supported v{}",
                found, SCHEMA_VERSION
            )))
        }
    }
}

/// 0 for a database without the version table
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let tracked = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    if tracked.is_none() {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at)
         VALUES (?1, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))",
        [version],
    )?;
    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(include_str!("../../schema.sql"))
        .map_err(|e| AppError::Storage(format!("Cannot create schema: {}", e)))
}

/// Run `PRAGMA integrity_check`; anything but "ok" is a storage error
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let verdict: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if verdict != "ok" {
        return Err(AppError::Storage(format!("Integrity check reported: {}", verdict)));
    }
    Ok(())
}

/// Size on disk and row counts of the ledger tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub ingredient_count: i64,
    pub stock_movement_count: i64,
    pub dish_count: i64,
    pub recipe_line_count: i64,
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let size_bytes: i64 = conn.query_row(
        "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
        [],
        |row| row.get(0),
    )?;

    let rows = |table: &str| -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    };

    Ok(DatabaseStats {
        size_bytes,
        ingredient_count: rows("ingredient")?,
        stock_movement_count: rows("stock_movement")?,
        dish_count: rows("dish")?,
        recipe_line_count: rows("dish_ingredient")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = create_test_connection().unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 0);

        initialize_database(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 1);

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            tables,
            vec![
                "dish",
                "dish_ingredient",
                "id_sequence",
                "ingredient",
                "schema_version",
                "stock_movement"
            ]
        );
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = create_test_connection().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        set_schema_version(&conn, 2).unwrap();

        let err = initialize_database(&conn).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO stock_movement (id, id_ingredient, quantity, movement_type, unit, creation_datetime)
             VALUES (1, 42, '1', 'IN', 'KG', '2024-01-01T00:00:00.000000000Z')",
            [],
        );

        assert!(result.is_err(), "Foreign key constraint should have been violated");
    }

    #[test]
    fn test_enum_checks_enforced() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO dish (id, name, dish_type) VALUES (1, 'Soup', 'BRUNCH')",
            [],
        );

        assert!(result.is_err(), "Unknown dish type should be rejected");
    }

    #[test]
    fn test_database_stats() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let stats = get_database_stats(&conn).unwrap();

        assert!(stats.size_bytes > 0);
        assert_eq!(stats.ingredient_count, 0);
        assert_eq!(stats.stock_movement_count, 0);
        assert_eq!(stats.dish_count, 0);
        assert_eq!(stats.recipe_line_count, 0);
    }

    #[test]
    fn test_integrity_check() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        verify_database_integrity(&conn).unwrap();
    }
}
