//! Axum transport for the exploration engine.
//!
//! Every handler decodes a request, hands it to the
//! [`Explorer`] on the blocking pool and encodes the outcome. Errors always
//! use the `{"error": {"kind", "message"}}` envelope.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Settings;
use crate::explore::{
    ExploreError, ExploreResult, Explorer, ExportFormat, FieldSummary, QueryRequest, QueryResult,
    SourceSummary,
};
use crate::store::RecordStore;

/// Explorer over a type-erased store, shared by all handlers.
pub type SharedExplorer = Arc<Explorer<Arc<dyn RecordStore>>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub explorer: SharedExplorer,
}

impl AppState {
    pub fn new(explorer: SharedExplorer) -> Self {
        Self { explorer }
    }
}

/// Build the axum router with all routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/dynamic/data-sources", get(list_data_sources))
        .route("/api/dynamic/fields/{source}", get(list_fields))
        .route("/api/dynamic/query", post(execute_query))
        .route("/api/dynamic/export", post(export_query))
        .route("/api/dynamic/aggregate", post(aggregate_sources))
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(settings: &Settings, explorer: SharedExplorer) -> std::io::Result<()> {
    let app = router(AppState::new(explorer));
    let addr = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "wetland explorer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Error envelope
// ============================================================================

/// An error response: `{"error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }
}

impl From<ExploreError> for ApiError {
    fn from(err: ExploreError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "kind": self.kind,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

/// Run an engine call on the blocking pool; SQLite access blocks.
async fn blocking<T, F>(state: &AppState, call: F) -> Result<T, ApiError>
where
    F: FnOnce(&Explorer<Arc<dyn RecordStore>>) -> ExploreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let explorer = state.explorer.clone();
    tokio::task::spawn_blocking(move || call(&explorer))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "engine task did not complete");
            ApiError::from(ExploreError::ExecutionFailed)
        })?
        .map_err(ApiError::from)
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DataSourcesResponse {
    pub data_sources: Vec<SourceSummary>,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub source: String,
    pub fields: Vec<FieldSummary>,
}

/// Body of `POST /api/dynamic/export`: a query plus an output format.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub query: QueryRequest,
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /api/dynamic/data-sources
async fn list_data_sources(
    State(state): State<AppState>,
) -> Result<Json<DataSourcesResponse>, ApiError> {
    let data_sources = blocking(&state, |explorer| explorer.list_sources()).await?;
    Ok(Json(DataSourcesResponse { data_sources }))
}

/// GET /api/dynamic/fields/{source} - lenient, unknown sources list nothing.
async fn list_fields(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Json<FieldsResponse> {
    let fields = state.explorer.list_fields(&source);
    Json(FieldsResponse { source, fields })
}

/// POST /api/dynamic/query
async fn execute_query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResult>, ApiError> {
    let Json(request) = body?;
    let result = blocking(&state, move |explorer| explorer.execute(&request)).await?;
    Ok(Json(result))
}

/// POST /api/dynamic/export
async fn export_query(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(ExportRequest { query, format }) = body?;
    let export = blocking(&state, move |explorer| explorer.export(&query, format)).await?;

    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

/// POST /api/dynamic/aggregate - cross-source aggregation is not offered.
async fn aggregate_sources() -> ApiError {
    ApiError::new(
        StatusCode::NOT_IMPLEMENTED,
        "unsupported",
        "Cross-source aggregation is not supported",
    )
}
