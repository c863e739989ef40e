// src/db/sequence.rs
//
// Identifier allocation
//
// Each (table, column) pair that receives generated identifiers has a row in
// `id_sequence`. Allocation first resynchronises the sequence to the current
// maximum of the column, then draws the next value, so rows inserted with
// explicit identifiers can never collide with a later allocation.
//
// Allocation takes a Transaction: the draw and the insert that uses it commit
// or roll back together. Writers open their transactions with
// BEGIN IMMEDIATE, so the database write lock is already held when the
// maximum is read.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::{AppError, AppResult};

/// Allocate a fresh identifier for `table.column`
pub fn allocate(tx: &Transaction<'_>, table: &str, column: &str) -> AppResult<i64> {
    ensure_identifier(table)?;
    ensure_identifier(column)?;

    let last_value = current(tx, table, column)?;

    let max_value: i64 = tx.query_row(
        &format!("SELECT COALESCE(MAX({}), 0) FROM {}", column, table),
        [],
        |row| row.get(0),
    )?;

    let next = max_value.checked_add(1).ok_or_else(|| {
        AppError::Storage(format!("Sequence {}.{} exhausted", table, column))
    })?;
    tx.execute(
        "UPDATE id_sequence SET last_value = ?3 WHERE table_name = ?1 AND column_name = ?2",
        params![table, column, next],
    )?;

    if last_value != max_value {
        debug!(
            "Sequence {}.{} resynchronised from {} to {}",
            table, column, last_value, max_value
        );
    }
    debug!("Allocated {}.{} = {}", table, column, next);

    Ok(next)
}

/// Last value drawn from the sequence bound to `table.column`
pub fn current(conn: &Connection, table: &str, column: &str) -> AppResult<i64> {
    conn.query_row(
        "SELECT last_value FROM id_sequence WHERE table_name = ?1 AND column_name = ?2",
        params![table, column],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| {
        AppError::Configuration(format!("No sequence bound to {}.{}", table, column))
    })
}

/// Bind a sequence to `table.column`. Registering twice is a no-op.
pub fn register(conn: &Connection, table: &str, column: &str) -> AppResult<()> {
    ensure_identifier(table)?;
    ensure_identifier(column)?;

    conn.execute(
        "INSERT OR IGNORE INTO id_sequence (table_name, column_name, last_value) VALUES (?1, ?2, 0)",
        params![table, column],
    )?;
    Ok(())
}

/// Table and column names are spliced into SQL, so only plain identifiers pass
fn ensure_identifier(name: &str) -> AppResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::Configuration(format!(
            "'{}' is not a valid table or column name",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_connection, initialize_database};

    fn setup() -> Connection {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_first_allocation_on_empty_table() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();

        assert_eq!(allocate(&tx, "ingredient", "id").unwrap(), 1);
        tx.commit().unwrap();

        assert_eq!(current(&conn, "ingredient", "id").unwrap(), 1);
    }

    #[test]
    fn test_allocation_skips_past_explicit_ids() {
        let mut conn = setup();
        conn.execute(
            "INSERT INTO dish (id, name, dish_type) VALUES (41, 'Imported', 'MAIN')",
            [],
        )
        .unwrap();

        let tx = conn.transaction().unwrap();
        let id = allocate(&tx, "dish", "id").unwrap();
        assert_eq!(id, 42);
    }

    #[test]
    fn test_exhausted_sequence_is_storage_error() {
        let mut conn = setup();
        conn.execute(
            "INSERT INTO dish (id, name, dish_type) VALUES (?1, 'Last', 'MAIN')",
            [i64::MAX],
        )
        .unwrap();

        let tx = conn.transaction().unwrap();
        let err = allocate(&tx, "dish", "id").unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_consecutive_allocations_follow_inserts() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();

        let first = allocate(&tx, "dish", "id").unwrap();
        tx.execute(
            "INSERT INTO dish (id, name, dish_type) VALUES (?1, 'Soup', 'START')",
            [first],
        )
        .unwrap();
        let second = allocate(&tx, "dish", "id").unwrap();

        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_rollback_discards_draw() {
        let mut conn = setup();
        {
            let tx = conn.transaction().unwrap();
            allocate(&tx, "stock_movement", "id").unwrap();
        }

        assert_eq!(current(&conn, "stock_movement", "id").unwrap(), 0);
    }

    #[test]
    fn test_unbound_pair_is_configuration_error() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();

        let err = allocate(&tx, "dish_ingredient", "id_dish").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_rejects_non_identifier_names() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();

        let err = allocate(&tx, "dish; DROP TABLE dish", "id").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_register_new_sequence() {
        let mut conn = setup();
        register(&conn, "dish_ingredient", "id_dish").unwrap();
        register(&conn, "dish_ingredient", "id_dish").unwrap();

        let tx = conn.transaction().unwrap();
        assert_eq!(allocate(&tx, "dish_ingredient", "id_dish").unwrap(), 1);
    }
}
