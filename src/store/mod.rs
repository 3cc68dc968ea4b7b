//! Underlying entity store.
//!
//! The engine only ever reaches data through [`RecordStore`]: it hands over
//! a fully rendered [`Statement`] and gets rows of [`Value`] cells back.
//! [`SqliteStore`] is the production implementation.

mod demo;
mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::sql::{count_star, Query, Statement, TableRef, Value};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the entity store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store connection lock poisoned")]
    Poisoned,

    #[error("Unexpected result shape: {0}")]
    UnexpectedShape(String),
}

/// Read access to the entity collections.
pub trait RecordStore: Send + Sync {
    /// Run a read-only statement and return every row.
    fn fetch(&self, statement: &Statement) -> StoreResult<Vec<Vec<Value>>>;

    /// Number of rows in a table.
    fn count_rows(&self, table: &str) -> StoreResult<u64> {
        let statement = Query::new()
            .select(vec![count_star()])
            .from(TableRef::new(table))
            .to_statement();
        let rows = self.fetch(&statement)?;
        match rows.first().and_then(|row| row.first()) {
            Some(Value::Integer(n)) if *n >= 0 => Ok(*n as u64),
            other => Err(StoreError::UnexpectedShape(format!(
                "COUNT(*) on '{}' returned {:?}",
                table, other
            ))),
        }
    }
}

impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    fn fetch(&self, statement: &Statement) -> StoreResult<Vec<Vec<Value>>> {
        (**self).fetch(statement)
    }

    fn count_rows(&self, table: &str) -> StoreResult<u64> {
        (**self).count_rows(table)
    }
}
