//! Text Extractor: turns a PDF or DOCX file into plain text.

use std::path::Path;

use crate::errors::AppError;

/// Document formats the analyzer can read. Anything else is skipped upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classifies an archive member by its extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// Reads the whole document at `path` as plain text.
///
/// Blocking: callers on the async runtime must go through `spawn_blocking`.
pub fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, AppError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let unreadable = |reason: String| AppError::UnreadableDocument {
        file_name: file_name.clone(),
        reason,
    };

    let data = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    match kind {
        DocumentKind::Pdf => extract_text_from_pdf(&data).map_err(unreadable),
        DocumentKind::Docx => extract_text_from_docx(&data).map_err(unreadable),
    }
}

/// Page text concatenated in document order.
fn extract_text_from_pdf(data: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| format!("invalid PDF: {e}"))
}

/// Paragraph texts joined by newline. Tables and headers are not part of the body paragraphs.
fn extract_text_from_docx(data: &[u8]) -> Result<String, String> {
    use docx_rs::DocumentChild;

    let docx = docx_rs::read_docx(data).map_err(|e| format!("invalid DOCX: {e}"))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            push_paragraph_children(&p.children, &mut text);
            paragraphs.push(text);
        }
    }
    Ok(paragraphs.join("\n"))
}

/// Appends run text, descending into hyperlinks so linked URLs are kept.
fn push_paragraph_children(children: &[docx_rs::ParagraphChild], text: &mut String) {
    use docx_rs::{ParagraphChild, RunChild};

    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, text),
            _ => {}
        }
    }
}
