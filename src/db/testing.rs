// src/db/testing.rs
//
// Shared fixture for repository tests: a migrated database file in a
// temporary directory, removed when the fixture is dropped.

use std::sync::Arc;

use tempfile::TempDir;

use super::{create_connection_pool, initialize_database, ConnectionPool};
use crate::config::DatabaseConfig;

pub(crate) struct TestDatabase {
    pub pool: Arc<ConnectionPool>,
    _dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = DatabaseConfig::at(dir.path().join("kitchen.db"));
        config.max_connections = 4;

        let pool = create_connection_pool(&config).expect("pool");
        initialize_database(&pool.get().expect("connection")).expect("schema");

        Self {
            pool: Arc::new(pool),
            _dir: dir,
        }
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.pool
            .get()
            .expect("connection")
            .query_row(sql, [], |row| row.get(0))
            .expect("count query")
    }
}
