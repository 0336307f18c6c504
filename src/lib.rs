//! Water Quality Assessor
//!
//! Classifies water-quality measurements against WHO-style guideline ranges
//! into a Low / Medium / High risk rating with treatment recommendations.
//!
//! - `parameters/`: the immutable guideline table
//! - `assessment/`: range comparison and the risk engine
//! - `form`, `storage`, `report/`: callers of the engine (form coercion,
//!   SQLite persistence, HTML/Markdown/JSON reports)
//! - `api_server`, `web/`: axum server and pages (feature `api`)

pub mod parameters;
pub mod assessment;
pub mod form;
pub mod storage;
pub mod report;
pub mod config;

#[cfg(feature = "api")]
pub mod web;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use parameters::{Category, ParameterDefinition, ParameterTable, Range};
pub use assessment::{assess, AssessError, Assessment, Finding, MeasurementSet, RiskAssessor, RiskLevel};
pub use form::{parse_submission, FormError, SiteInfo, WaterSource};
pub use storage::{StorageError, SubmissionRecord, SubmissionStore};
pub use report::{ReportFormat, WaterReport};
pub use config::ServerConfig;

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
