//! Query Orchestrator - the engine's single entry point.
//!
//! `execute` walks validate → compile → plan → run → encode. Everything up
//! to and including planning is decided from the request and the registry;
//! the store is only reached once a request is known to be valid.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::encoder::{encode_chart, encode_table, GroupCap, QueryResult, ShapeError, TableResult};
use super::error::{ExploreError, ExploreResult};
use super::filter::compile;
use super::planner::{plan, Plan, ResolvedQuery};
use super::request::QueryRequest;
use crate::config::QuerySettings;
use crate::registry::{Registry, SemanticType};
use crate::store::{RecordStore, StoreError};

/// A data source as listed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub record_count: u64,
}

/// A field as listed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
}

/// Chart-mode output bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerLimits {
    /// `None` leaves charts uncapped.
    pub max_chart_groups: Option<usize>,
    pub other_label: String,
}

impl Default for ExplorerLimits {
    fn default() -> Self {
        ExplorerLimits::from(&QuerySettings::default())
    }
}

impl From<&QuerySettings> for ExplorerLimits {
    fn from(settings: &QuerySettings) -> Self {
        Self {
            max_chart_groups: settings.chart_group_cap(),
            other_label: settings.other_label.clone(),
        }
    }
}

/// Failures past validation. Never shown to callers.
#[derive(Debug, thiserror::Error)]
enum Fault {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Runs exploration queries against a record store.
///
/// Holds no mutable state: the registry is shared read-only and the store
/// serialises its own access, so one explorer can serve concurrent callers.
pub struct Explorer<S> {
    registry: Arc<Registry>,
    store: S,
    limits: ExplorerLimits,
}

impl<S: RecordStore> Explorer<S> {
    pub fn new(registry: Arc<Registry>, store: S) -> Self {
        Self {
            registry,
            store,
            limits: ExplorerLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ExplorerLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one exploration request.
    pub fn execute(&self, request: &QueryRequest) -> ExploreResult<QueryResult> {
        let plan = match self.prepare(request) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(
                    source = %request.source,
                    kind = err.kind(),
                    error = %err,
                    "rejected exploration query"
                );
                return Err(err);
            }
        };

        match self.run(&plan) {
            Ok(result) => {
                tracing::debug!(
                    source = %request.source,
                    chart_type = %result.chart_type(),
                    entries = result.len(),
                    "exploration query executed"
                );
                Ok(result)
            }
            Err(fault) => {
                tracing::error!(
                    source = %request.source,
                    error = %fault,
                    "exploration query failed"
                );
                Err(ExploreError::ExecutionFailed)
            }
        }
    }

    /// Run `request` in table mode, whatever chart type it asked for.
    pub(crate) fn execute_table(&self, request: &QueryRequest) -> ExploreResult<TableResult> {
        let mut request = request.clone();
        request.chart_type = super::request::ChartType::Table;
        match self.execute(&request)? {
            QueryResult::Table(table) => Ok(table),
            QueryResult::Chart(_) => {
                tracing::error!(source = %request.source, "table request produced a chart");
                Err(ExploreError::ExecutionFailed)
            }
        }
    }

    /// Every registered source with a live record count.
    pub fn list_sources(&self) -> ExploreResult<Vec<SourceSummary>> {
        self.registry
            .sources()
            .map(|source| {
                let record_count = self.store.count_rows(&source.table).map_err(|err| {
                    tracing::error!(source = %source.id, error = %err, "counting records failed");
                    ExploreError::ExecutionFailed
                })?;
                Ok(SourceSummary {
                    id: source.id.clone(),
                    display_name: source.display_name.clone(),
                    description: source.description.clone(),
                    icon: source.icon.clone(),
                    record_count,
                })
            })
            .collect()
    }

    /// Fields of a source in display order. An unknown source lists nothing.
    pub fn list_fields(&self, source_id: &str) -> Vec<FieldSummary> {
        self.registry
            .fields_for(source_id)
            .iter()
            .map(|field| FieldSummary {
                id: field.id.clone(),
                name: field.display_name.clone(),
                semantic_type: field.semantic_type,
            })
            .collect()
    }

    /// Validate, compile and plan. Touches nothing but the registry.
    fn prepare(&self, request: &QueryRequest) -> ExploreResult<Plan> {
        let registry = self.registry.as_ref();
        let source = registry
            .source(&request.source)
            .map_err(|_| ExploreError::InvalidSource(request.source.clone()))?;

        for field_id in request.referenced_fields() {
            registry.resolve(&source.id, field_id)?;
        }

        let predicate = compile(registry, &source.id, &request.filters)?;

        let resolved = ResolvedQuery {
            source,
            chart_type: request.chart_type,
            x: registry.resolve(&source.id, &request.x_field)?,
            y: request
                .y_field
                .as_deref()
                .map(|y| registry.resolve(&source.id, y))
                .transpose()?,
            group_by: request
                .group_by
                .as_deref()
                .map(|g| registry.resolve(&source.id, g))
                .transpose()?,
        };

        plan(&resolved, &predicate)
    }

    fn run(&self, plan: &Plan) -> Result<QueryResult, Fault> {
        match plan {
            Plan::Chart(chart) => {
                let groups = self.store.fetch(&chart.groups)?;
                let total = self.store.fetch(&chart.total)?;
                let cap = self.limits.max_chart_groups.map(|max_groups| GroupCap {
                    max_groups,
                    other_label: self.limits.other_label.clone(),
                });
                Ok(QueryResult::Chart(encode_chart(chart, groups, total, cap.as_ref())?))
            }
            Plan::Table(table) => {
                let rows = self.store.fetch(&table.statement)?;
                Ok(QueryResult::Table(encode_table(table, rows)?))
            }
        }
    }
}
