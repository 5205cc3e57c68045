pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::config::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Room for multipart boundaries and the job description on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route(
            "/api/supported-formats",
            get(handlers::handle_supported_formats),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + FORM_OVERHEAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::engine::Analyzer;
    use crate::analysis::lexicon::Lexicon;
    use crate::config::Config;
    use crate::extraction::docx::tests::docx_with_paragraphs;

    const BOUNDARY: &str = "reviewer-test-boundary";
    const JOB: &str = "Backend engineer with Python and Go experience, operating Kubernetes in production.";

    fn app() -> Router {
        let config = Config::default();
        let analyzer = Analyzer::from_config(&config, Arc::new(Lexicon::builtin()));
        build_router(AppState { config, analyzer })
    }

    enum Part<'a> {
        File(&'a str, &'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    fn analyze_request(parts: &[Part<'_>]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        for uri in ["/health", "/api/health"] {
            let (status, body) = send(get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
        }
        let (status, body) = send(get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Resume Reviewer API");
    }

    #[tokio::test]
    async fn test_supported_formats() {
        let (status, body) = send(get("/api/supported-formats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"supported_formats": ["docx", "pdf"], "max_file_size_mb": 16})
        );
    }

    #[tokio::test]
    async fn test_analyze_docx() {
        let docx = docx_with_paragraphs(&[
            "Jane Doe",
            "Experience",
            "Built payment services in Python and Go.",
            "Skills",
            "Python, Go",
        ]);
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "resume.docx", &docx),
            Part::Text("job_description", JOB),
        ]))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tech_skill_score"], 67);
        assert_eq!(body["tech_skill_misses"], json!(["kubernetes"]));
        assert_eq!(body["metadata"]["filename"], "resume.docx");
        assert_eq!(body["metadata"]["job_description_length"], JOB.chars().count());
    }

    #[tokio::test]
    async fn test_missing_job_description_is_rejected() {
        let (status, body) = send(analyze_request(&[Part::File(
            "resume_file",
            "resume.pdf",
            b"%PDF-1.4",
        )]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "No job description provided");
    }

    #[tokio::test]
    async fn test_short_job_description_is_rejected() {
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "resume.pdf", b"%PDF-1.4"),
            Part::Text("job_description", "Rust engineer"),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "JOB_DESCRIPTION_TOO_SHORT");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unprocessable() {
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "resume.pdf", b"not really a pdf"),
            Part::Text("job_description", JOB),
        ]))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "CORRUPT_DOCUMENT");
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "resume.txt", b"Jane Doe"),
            Part::Text("job_description", JOB),
        ]))
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let oversized = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "resume.pdf", &oversized),
            Part::Text("job_description", JOB),
        ]))
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(body["error"]["message"], "File too large. Maximum size is 16MB");
    }

    #[tokio::test]
    async fn test_uploaded_filename_loses_its_directories() {
        let docx = docx_with_paragraphs(&["Experience", "Built services in Python and Go."]);
        let (status, body) = send(analyze_request(&[
            Part::File("resume_file", "../../home/jane/resume.docx", &docx),
            Part::Text("job_description", JOB),
        ]))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["filename"], "resume.docx");
    }
}
