use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure kinds produced by the analysis pipeline.
///
/// Every component reports one of these; the orchestrator wraps it in an
/// [`AnalysisFailure`] without changing the kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Unsupported file type: {0}. Please upload a PDF or DOCX file.")]
    UnsupportedFormat(String),

    #[error("Could not read the document: {0}")]
    CorruptDocument(String),

    #[error("Job description is too short ({actual} characters). Please provide at least {minimum} characters.")]
    JobDescriptionTooShort { actual: usize, minimum: usize },

    #[error("Analysis exceeded the {0}-second time budget")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Stable machine-readable kind, used as the `code` of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalysisError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            AnalysisError::JobDescriptionTooShort { .. } => "JOB_DESCRIPTION_TOO_SHORT",
            AnalysisError::Timeout(_) => "TIMEOUT",
            AnalysisError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Pipeline stage an analysis was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Received,
    Extracting,
    Analyzing,
    Completed,
    Failed,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Received => "received",
            AnalysisStage::Extracting => "extracting",
            AnalysisStage::Analyzing => "analyzing",
            AnalysisStage::Completed => "completed",
            AnalysisStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An [`AnalysisError`] with the request context it happened in.
#[derive(Debug, Clone, Error)]
#[error("{filename}: {error} (stage: {stage})")]
pub struct AnalysisFailure {
    pub filename: String,
    pub stage: AnalysisStage,
    #[source]
    pub error: AnalysisError,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Analysis(failure) => analysis_failure_parts(failure),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn analysis_failure_parts(failure: &AnalysisFailure) -> (StatusCode, &'static str, String) {
    let code = failure.error.code();
    match &failure.error {
        AnalysisError::UnsupportedFormat(_) => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, code, failure.to_string())
        }
        AnalysisError::CorruptDocument(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, code, failure.to_string())
        }
        AnalysisError::JobDescriptionTooShort { .. } => {
            (StatusCode::BAD_REQUEST, code, failure.to_string())
        }
        AnalysisError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, code, failure.to_string()),
        AnalysisError::Internal(detail) => {
            tracing::error!(
                filename = %failure.filename,
                stage = %failure.stage,
                "Internal analysis error: {detail}"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "An internal server error occurred".to_string(),
            )
        }
    }
}
