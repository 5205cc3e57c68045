use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::analysis::engine::AnalysisRequest;
use crate::analysis::models::AnalysisResult;
use crate::config::MAX_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::extraction::SUPPORTED_EXTENSIONS;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume_file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Debug, Serialize)]
pub struct SupportedFormatsResponse {
    pub supported_formats: Vec<&'static str>,
    pub max_file_size_mb: usize,
}

/// The two form fields of an analysis upload, before validation.
#[derive(Default)]
struct Upload {
    file: Option<(String, Bytes)>,
    job_description: Option<String>,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    let request = validate_upload(upload)?;

    info!(
        filename = %request.resume_filename,
        bytes = request.resume_bytes.len(),
        "Analyzing resume upload"
    );
    let result = state.analyzer.run(request).await?;
    Ok(Json(result))
}

/// GET /api/supported-formats
pub async fn handle_supported_formats(
    State(state): State<AppState>,
) -> Json<SupportedFormatsResponse> {
    Json(SupportedFormatsResponse {
        supported_formats: SUPPORTED_EXTENSIONS.to_vec(),
        max_file_size_mb: state.config.max_upload_mb(),
    })
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(too_large());
                }
                upload.file = Some((filename, data));
            }
            JOB_DESCRIPTION_FIELD => {
                upload.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(upload)
}

fn validate_upload(upload: Upload) -> Result<AnalysisRequest, AppError> {
    let (filename, data) = upload
        .file
        .ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    let job_description = upload
        .job_description
        .ok_or_else(|| AppError::Validation("No job description provided".to_string()))?;

    let filename = sanitize_filename(&filename);
    if filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }

    Ok(AnalysisRequest {
        resume_bytes: data,
        resume_filename: filename,
        job_description,
    })
}

/// Final path component of a client-supplied filename, without control
/// characters or surrounding whitespace.
fn sanitize_filename(raw: &str) -> String {
    let name = raw.rsplit(&['/', '\\'][..]).next().unwrap_or(raw);
    let name: String = name.chars().filter(|c| !c.is_control()).collect();
    match name.trim() {
        "." | ".." => String::new(),
        trimmed => trimmed.to_string(),
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "File too large. Maximum size is {}MB",
        MAX_UPLOAD_BYTES / (1024 * 1024)
    ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}
