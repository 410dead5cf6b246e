use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

use crate::errors::AppError;

/// Failures while turning an uploaded document into plain text.
///
/// All of these are caller errors (a bad or empty upload), so they map to a
/// 400 rather than a 500.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported document type '{0}'. Supported types: txt, pdf, docx")]
    UnsupportedType(String),
    #[error("The document contains no extractable text")]
    EmptyContent,
    #[error("The document could not be parsed: {0}")]
    CorruptDocument(String),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extracts plain text from an uploaded document.
///
/// The declared content type wins when it names a known format; otherwise the
/// filename extension decides. Text that is empty after trimming is rejected
/// so a prompt is never built around a blank document.
pub fn extract_text(
    bytes: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<String, DocumentError> {
    let text = match detect_kind(content_type, filename)? {
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::CorruptDocument(e.to_string()))?,
        DocumentKind::Docx => docx_paragraphs(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(DocumentError::EmptyContent);
    }
    Ok(text)
}

fn detect_kind(
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<DocumentKind, DocumentError> {
    // Media type parameters (e.g. "; charset=utf-8") are irrelevant here.
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    if let Some(mime) = mime.as_deref() {
        if mime == "application/pdf" {
            return Ok(DocumentKind::Pdf);
        }
        if mime == DOCX_MIME {
            return Ok(DocumentKind::Docx);
        }
        if mime.starts_with("text/") {
            return Ok(DocumentKind::PlainText);
        }
    }

    let extension = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") => Ok(DocumentKind::PlainText),
        Some("pdf") => Ok(DocumentKind::Pdf),
        Some("docx") => Ok(DocumentKind::Docx),
        _ => {
            let label = mime
                .or(extension)
                .or_else(|| filename.map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string());
            Err(DocumentError::UnsupportedType(label))
        }
    }
}

/// Flattens a DOCX body into newline separated paragraph text. Tables,
/// headers and drawings are skipped.
fn docx_paragraphs(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = read_docx(bytes).map_err(|e| DocumentError::CorruptDocument(e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children.iter() {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text: String = paragraph
                .children
                .iter()
                .filter_map(|pc| {
                    if let ParagraphChild::Run(run) = pc {
                        Some(
                            run.children
                                .iter()
                                .filter_map(|rc| {
                                    if let RunChild::Text(t) = rc {
                                        Some(t.text.clone())
                                    } else {
                                        None
                                    }
                                })
                                .collect::<Vec<_>>()
                                .join(""),
                        )
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join("");

            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}
