// tests/common/mod.rs
//
// Shared fixtures: an in-memory store loaded with the demonstration data and
// store wrappers that observe or break storage access.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wetland_explorer::explore::{ChartResult, Explorer, QueryResult, TableResult};
use wetland_explorer::registry::Registry;
use wetland_explorer::sql::{Statement, Value};
use wetland_explorer::store::{RecordStore, SqliteStore, StoreError, StoreResult};

pub fn demo_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.seed_demo().unwrap());
    store
}

pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::builtin().unwrap())
}

pub fn explorer() -> Explorer<SqliteStore> {
    Explorer::new(registry(), demo_store())
}

pub fn chart(result: QueryResult) -> ChartResult {
    match result {
        QueryResult::Chart(chart) => chart,
        QueryResult::Table(table) => panic!("expected a chart result, got {:?}", table),
    }
}

pub fn table(result: QueryResult) -> TableResult {
    match result {
        QueryResult::Table(table) => table,
        QueryResult::Chart(chart) => panic!("expected a table result, got {:?}", chart),
    }
}

/// Numeric view of chart data, for easy comparison.
pub fn values(chart: &ChartResult) -> Vec<f64> {
    chart.data.iter().map(|v| v.as_f64()).collect()
}

/// Counts every statement that reaches the wrapped store.
pub struct CountingStore<S> {
    inner: S,
    fetches: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl<S: RecordStore> RecordStore for CountingStore<S> {
    fn fetch(&self, statement: &Statement) -> StoreResult<Vec<Vec<Value>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(statement)
    }
}

/// A store whose every access fails.
pub struct BrokenStore;

impl RecordStore for BrokenStore {
    fn fetch(&self, _statement: &Statement) -> StoreResult<Vec<Vec<Value>>> {
        Err(StoreError::UnexpectedShape(
            "disk I/O error at /var/lib/wetlands.db".to_string(),
        ))
    }
}

/// 30 extra sites, each reporting all five demo threats (150 links).
pub fn add_many_threat_links(store: &SqliteStore) {
    let mut sql = String::new();
    for site in 100..130 {
        sql.push_str(&format!(
            "INSERT INTO wetland_sites (id, name, region, is_ramsar_site) VALUES ({0}, 'Mare {0}', 'Gorgol', 0);\n",
            site
        ));
        for threat in 1..=5 {
            sql.push_str(&format!(
                "INSERT INTO site_threats (site_id, threat_id, intensity) VALUES ({}, {}, 'Faible');\n",
                site, threat
            ));
        }
    }
    store.execute_batch(&sql).unwrap();
}
