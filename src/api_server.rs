// Axum API Server Module
//
// Purpose: web form + JSON API around the risk assessment engine, with
// SQLite persistence and downloadable reports

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Form, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::assessment::{AssessError, Assessment, MeasurementSet, RiskAssessor};
use crate::config::ServerConfig;
use crate::form::{parse_submission, SiteInfo};
use crate::parameters::{ParameterDefinition, ParameterTable};
use crate::report::{ReportFormat, WaterReport};
use crate::storage::{StorageError, SubmissionRecord, SubmissionStore};
use crate::web::handlers::{AssessPage, ResultView};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub assessor: RiskAssessor,
    pub store: Arc<Mutex<SubmissionStore>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Opening submission store at {}", config.database_path);
        let store = SubmissionStore::open(&config.database_path)?;
        Ok(Self::with_store(store))
    }

    /// State backed by a private in-memory database
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::with_store(SubmissionStore::open_in_memory()?))
    }

    pub fn with_store(store: SubmissionStore) -> Self {
        let table = ParameterTable::who_guidelines();
        tracing::info!("Loaded {} parameter guidelines", table.len());
        Self {
            assessor: RiskAssessor::new(Arc::new(table)),
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn table(&self) -> &ParameterTable {
        self.assessor.table()
    }

    /// Run `f` against the store on the blocking pool
    async fn run_store<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&SubmissionStore) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| AppError::Internal("submission store lock poisoned".to_string()))?;
            f(&guard).map_err(AppError::from)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // HTML form
        .route("/", get(home_page).post(submit_form))

        // Reports
        .route("/download", get(download_latest))
        .route("/reports/:id", get(get_report))

        // JSON API
        .route("/api/assess", post(assess_measurements))
        .route("/api/parameters", get(list_parameters))
        .route("/api/submissions", get(list_submissions))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let submissions = state.run_store(|store| store.count()).await?;
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "submissions": submissions,
    })))
}

async fn home_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(AssessPage::new(state.table()))
}

async fn submit_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let (site, measurements) = match parse_submission(&fields, state.table()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Rejected form submission: {}", e);
            let page = AssessPage::with_input(state.table(), &fields).with_error(e.to_string());
            return Ok((StatusCode::BAD_REQUEST, render_page(page)?).into_response());
        }
    };

    let assessment = state.assessor.assess(&measurements)?;
    let id = record_submission(&state, site, measurements, assessment.clone()).await?;

    let page = AssessPage::with_input(state.table(), &fields).with_result(ResultView::new(id, &assessment));
    Ok(render_page(page)?.into_response())
}

async fn record_submission(
    state: &AppState,
    site: SiteInfo,
    measurements: MeasurementSet,
    assessment: Assessment,
) -> Result<i64, AppError> {
    state
        .run_store(move |store| store.record(&site, &measurements, &assessment))
        .await
}

/// Latest submission's report as an HTML attachment
async fn download_latest(State(state): State<AppState>) -> Result<Response, AppError> {
    let record = state
        .run_store(|store| store.latest())
        .await?
        .ok_or_else(|| AppError::NotFound("No report has been generated yet".to_string()))?;

    let report = build_report(&state, &record)?;
    let format = ReportFormat::Html;
    let body = format.render(&report).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name(format.extension())),
            ),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, serde::Deserialize)]
struct ReportQuery {
    format: Option<String>,
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let format = match params.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>().map_err(AppError::BadRequest)?,
        None => ReportFormat::Html,
    };

    let record = state
        .run_store(move |store| store.get(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))?;

    let report = build_report(&state, &record)?;
    let body = format.render(&report).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Re-run the engine on stored measurements to recover full findings
fn build_report(state: &AppState, record: &SubmissionRecord) -> Result<WaterReport, AppError> {
    let assessment = state
        .assessor
        .assess(&record.measurements)
        .map_err(|e| AppError::Internal(format!("submission {}: {}", record.id, e)))?;
    Ok(WaterReport::from_record(record, &assessment, state.table()))
}

async fn assess_measurements(
    State(state): State<AppState>,
    Json(values): Json<BTreeMap<String, f64>>,
) -> Result<Json<Assessment>, AppError> {
    let measurements = MeasurementSet::from(values);
    let assessment = state.assessor.assess(&measurements)?;
    Ok(Json(assessment))
}

async fn list_parameters(State(state): State<AppState>) -> Json<Vec<ParameterDefinition>> {
    Json(state.table().iter().cloned().collect())
}

#[derive(Debug, serde::Deserialize)]
struct SubmissionsQuery {
    limit: Option<usize>,
}

async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<SubmissionsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = params.limit.unwrap_or(20).min(100);
    let records = state.run_store(move |store| store.recent(limit)).await?;

    Ok(Json(serde_json::json!({
        "rows": records.len(),
        "data": records,
    })))
}

fn render_page(page: AssessPage) -> Result<Html<String>, AppError> {
    page.render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template error: {}", e)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Storage(String),
    Internal(String),
}

impl From<AssessError> for AppError {
    fn from(err: AssessError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Storage(msg) => {
                tracing::error!("Storage failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
