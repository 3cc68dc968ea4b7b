//! The Dynamic Data Exploration Engine.
//!
//! A caller names a source, a grouping field, an optional value field, a
//! chart type and filters; the engine validates everything against the
//! [`Registry`](crate::registry::Registry), compiles it to parameterised SQL
//! and returns chart-ready or table-ready data.
//!
//! - **request**: wire-level request types
//! - **filter**: Filter Compiler
//! - **planner**: Aggregation Planner
//! - **encoder**: Result Encoder
//! - **orchestrator**: [`Explorer`], the single entry point
//! - **export**: CSV/JSON export of table results
//!
//! ```text
//! QueryRequest → resolve → compile filters → plan → fetch → encode → QueryResult
//! ```

mod encoder;
mod error;
mod export;
mod filter;
mod orchestrator;
mod planner;
mod request;

pub use encoder::{ChartResult, QueryResult, SeriesValue, TableResult};
pub use error::{ExploreError, ExploreResult};
pub use export::{to_csv, Export, ExportFormat};
pub use filter::{compile, Predicate};
pub use orchestrator::{Explorer, ExplorerLimits, FieldSummary, SourceSummary};
pub use planner::TABLE_ROW_CAP;
pub use request::{ChartType, FilterClause, FilterValue, QueryRequest, ScalarValue, COUNT_TOKEN};
