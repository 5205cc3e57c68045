//! Document extraction: turns an uploaded resume (PDF or DOCX) into cleaned plain text.
//!
//! Format is chosen by extension and then validated against the file signature.
//! A filename without an extension falls back to content sniffing.
//! Extraction is all-or-nothing: any parse failure is reported, never partial text.

pub mod docx;
pub mod pdf;

use crate::errors::AnalysisError;

/// Extensions accepted for upload, as reported to clients.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "pdf"];

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
/// PDF readers accept the header anywhere in the first KiB.
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    /// Whether `bytes` carry this format's file signature.
    fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            DocumentFormat::Pdf => {
                let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
                window
                    .windows(PDF_SIGNATURE.len())
                    .any(|w| w == PDF_SIGNATURE)
            }
            DocumentFormat::Docx => bytes.starts_with(ZIP_SIGNATURE),
        }
    }

    fn sniff(bytes: &[u8]) -> Option<Self> {
        [DocumentFormat::Pdf, DocumentFormat::Docx]
            .into_iter()
            .find(|format| format.matches_signature(bytes))
    }
}

/// Returns the extension of `filename` if it has one (`"resume.PDF"` → `"PDF"`).
fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Resolves the document format. The extension wins, but its claim must hold up
/// against the actual bytes.
pub fn detect_format(filename: &str, bytes: &[u8]) -> Result<DocumentFormat, AnalysisError> {
    match extension_of(filename) {
        Some(ext) => {
            let format = DocumentFormat::from_extension(ext)
                .ok_or_else(|| AnalysisError::UnsupportedFormat(format!(".{ext}")))?;
            if !format.matches_signature(bytes) {
                return Err(AnalysisError::CorruptDocument(format!(
                    "file has a .{} extension but its content is not a {} document",
                    format.extension(),
                    format.extension().to_uppercase()
                )));
            }
            Ok(format)
        }
        None => DocumentFormat::sniff(bytes).ok_or_else(|| {
            AnalysisError::UnsupportedFormat("unrecognized file content".to_string())
        }),
    }
}

/// Detects the format and extracts cleaned plain text.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, AnalysisError> {
    let format = detect_format(filename, bytes)?;
    let raw = match format {
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes)?,
    };

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(AnalysisError::CorruptDocument(format!(
            "no readable text found in the {} document",
            format.extension().to_uppercase()
        )));
    }
    Ok(text)
}

/// Trims every line and drops blank ones.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
