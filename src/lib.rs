//! # Wetland Explorer
//!
//! Dynamic data exploration over the records of a wetland biodiversity
//! platform: sites, species, observations, threats and conservation measures.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    QueryRequest                          │
//! │  (source, x_field, y_field, chart_type, filters, ...)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Resolved source + fields (registered paths)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter compiler, planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Parameterised SQL (sql builder)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │                Rows → chart / table result               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Only identifiers registered in the [`registry`] ever reach SQL text, and
//! every caller-supplied value travels as a bound parameter.

pub mod config;
pub mod explore;
pub mod logging;
pub mod registry;
pub mod sql;
pub mod store;

#[cfg(feature = "server")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::explore::{
        ChartResult, ChartType, ExploreError, ExploreResult, Explorer, ExplorerLimits, Export,
        ExportFormat, FilterClause, FilterValue, QueryRequest, QueryResult, ScalarValue,
        SeriesValue, TableResult,
    };
    pub use crate::registry::{AggregationKind, FieldDescriptor, Registry, SemanticType};
    pub use crate::store::{RecordStore, SqliteStore};
}
