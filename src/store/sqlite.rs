//! SQLite-backed entity store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, ToSql};

use super::demo::DEMO_DATA;
use super::schema::{SCHEMA, SCHEMA_VERSION};
use super::{RecordStore, StoreError, StoreResult};
use crate::sql::{Statement, Value};

/// SQLite entity store.
///
/// The connection is guarded by a mutex; SQLite connections are not `Sync`
/// and statements are short, so serialising them is sufficient.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Create tables if they don't exist and record the schema version.
    pub fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        let stored_version: Option<i32> = conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        if stored_version != Some(SCHEMA_VERSION) {
            conn.execute(
                "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?1)",
                params![SCHEMA_VERSION.to_string()],
            )?;
        }
        Ok(())
    }

    /// Load the demonstration data set. Returns `false` (and does nothing)
    /// if the database already holds sites.
    pub fn seed_demo(&self) -> StoreResult<bool> {
        let mut conn = self.lock()?;
        let existing: i64 =
            conn.query_row("SELECT COUNT(*) FROM wetland_sites", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let tx = conn.transaction()?;
        tx.execute_batch(DEMO_DATA)?;
        tx.commit()?;
        Ok(true)
    }

    /// Run trusted SQL (fixtures, maintenance). Not reachable from queries.
    pub fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn fetch(&self, statement: &Statement) -> StoreResult<Vec<Vec<Value>>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&statement.sql)?;
        let column_count = stmt.column_count();

        let rows = stmt.query_map(rusqlite::params_from_iter(statement.params.iter()), |row| {
            (0..column_count)
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?;

        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(n) => ToSqlOutput::Borrowed(ValueRef::Integer(*n)),
            Value::Real(x) => ToSqlOutput::Borrowed(ValueRef::Real(*x)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Integer(n),
            ValueRef::Real(x) => Value::Real(x),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}
