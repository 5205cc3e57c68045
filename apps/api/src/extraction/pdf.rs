use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::errors::AnalysisError;

/// Extracts text from in-memory PDF bytes.
///
/// `pdf-extract` can panic on malformed object streams, so the call is isolated and
/// a panic is reported the same way as a parse error.
pub fn extract(bytes: &[u8]) -> Result<String, AnalysisError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(Ok(text)) if text.trim().is_empty() => Err(AnalysisError::CorruptDocument(
            "PDF has no extractable text layer".to_string(),
        )),
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            Err(AnalysisError::CorruptDocument(format!(
                "failed to parse PDF file: {e}"
            )))
        }
        Err(_) => {
            warn!("PDF extraction panicked on malformed input");
            Err(AnalysisError::CorruptDocument(
                "failed to parse PDF file: malformed document structure".to_string(),
            ))
        }
    }
}
