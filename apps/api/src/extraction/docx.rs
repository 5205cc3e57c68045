//! DOCX extraction: reads `word/document.xml` out of the zip container and
//! flattens its runs into lines, one per paragraph.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::errors::AnalysisError;

const DOCUMENT_PART: &str = "word/document.xml";

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\b[^>]*/>|<w:(?:br|cr)\b[^>]*/>|</w:p>|<w:p(?:\s[^>]*)?/>")
            .expect("static DOCX markup pattern")
    })
}

/// Extracts paragraph text from in-memory DOCX bytes.
pub fn extract(bytes: &[u8]) -> Result<String, AnalysisError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        warn!("DOCX archive could not be opened: {e}");
        AnalysisError::CorruptDocument(format!("failed to open DOCX archive: {e}"))
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| {
            AnalysisError::CorruptDocument(format!("DOCX archive has no {DOCUMENT_PART}: {e}"))
        })?
        .read_to_string(&mut xml)
        .map_err(|e| {
            AnalysisError::CorruptDocument(format!("failed to read {DOCUMENT_PART}: {e}"))
        })?;

    if !xml.contains("<w:body") {
        return Err(AnalysisError::CorruptDocument(format!(
            "{DOCUMENT_PART} has no document body"
        )));
    }

    Ok(flatten_document_xml(&xml))
}

/// Collects `w:t` runs, mapping tabs, breaks and paragraph ends to whitespace.
fn flatten_document_xml(xml: &str) -> String {
    let mut text = String::with_capacity(xml.len() / 4);

    for caps in markup_pattern().captures_iter(xml) {
        match caps.get(1) {
            Some(run) => text.push_str(&decode_entities(run.as_str())),
            None => {
                let tag = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
                if tag.starts_with("<w:tab") {
                    text.push('\t');
                } else {
                    text.push('\n');
                }
            }
        }
    }

    text
}

/// Decodes the predefined XML entities and numeric character references.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi))
        });

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Builds a minimal DOCX whose body holds one paragraph per entry of `paragraphs`.
    pub(crate) fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        zip_with_entry(DOCUMENT_PART, &xml)
    }

    pub(crate) fn zip_with_entry(name: &str, content: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(name, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_paragraphs_as_lines() {
        let bytes = docx_with_paragraphs(&["Jane Doe", "EXPERIENCE", "Led the platform team"]);
        let text = extract(&bytes).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["Jane Doe", "EXPERIENCE", "Led the platform team"]
        );
    }

    #[test]
    fn test_runs_within_paragraph_are_joined() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>Node</w:t></w:r><w:r><w:t>.js</w:t></w:r>\
                   <w:r><w:tab/><w:t>Rust</w:t></w:r></w:p></w:body></w:document>";
        assert_eq!(flatten_document_xml(xml), "Node.js\tRust\n");
    }

    #[test]
    fn test_line_breaks_inside_paragraph() {
        let xml = "<w:body><w:p><w:r><w:t>Skills</w:t><w:br/><w:t>Python</w:t></w:r></w:p></w:body>";
        assert_eq!(flatten_document_xml(xml), "Skills\nPython\n");
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(decode_entities("R&amp;D &lt;team&gt;"), "R&D <team>");
        assert_eq!(decode_entities("caf&#233; &#x41;"), "café A");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_truncated_archive_is_corrupt() {
        let bytes = docx_with_paragraphs(&["Jane Doe"]);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            extract(truncated),
            Err(AnalysisError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_archive_without_document_part_is_corrupt() {
        let bytes = zip_with_entry("word/styles.xml", "<w:styles/>");
        let err = extract(&bytes).unwrap_err();
        assert!(matches!(err, AnalysisError::CorruptDocument(msg) if msg.contains(DOCUMENT_PART)));
    }

    #[test]
    fn test_document_without_body_is_corrupt() {
        let bytes = zip_with_entry(DOCUMENT_PART, "<w:document></w:document>");
        assert!(matches!(
            extract(&bytes),
            Err(AnalysisError::CorruptDocument(_))
        ));
    }
}
