//! In-memory document builders shared by the extraction tests.

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::extraction::fields::{ExtractError, FieldExtractor, ResumeFields};
use crate::llm_client::LlmError;

/// Builds a zip archive containing `(member name, bytes)` pairs.
pub fn zip_bytes(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Builds a DOCX file with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

/// Builds a DOCX with a single paragraph: plain `label` followed by a hyperlink to `url` showing `shown`.
pub fn docx_with_link_bytes(label: &str, url: &str, shown: &str) -> Vec<u8> {
    let paragraph = Paragraph::new()
        .add_run(Run::new().add_text(label))
        .add_hyperlink(
            Hyperlink::new(url, HyperlinkType::External).add_run(Run::new().add_text(shown)),
        );
    let mut cursor = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(paragraph)
        .build()
        .pack(&mut cursor)
        .unwrap();
    cursor.into_inner()
}

/// Builds a PDF with one page per entry, each page showing its text in Courier.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Offline stand-in for the remote model: pulls fields out of the text with plain keyword rules.
pub struct StubExtractor {
    calls: AtomicUsize,
    fail_when: Option<String>,
}

impl StubExtractor {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_when: None,
        }
    }

    /// Simulates a transport failure for every text containing `marker` ("" fails everything).
    pub fn failing_on(marker: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_when: Some(marker.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldExtractor for StubExtractor {
    async fn extract_fields(&self, text: &str) -> Result<ResumeFields, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_when {
            if text.contains(marker.as_str()) {
                return Err(ExtractError::Remote(LlmError::Api {
                    status: 503,
                    message: "model overloaded".to_string(),
                }));
            }
        }
        Ok(keyword_fields(text))
    }

    fn backend(&self) -> &str {
        "stub"
    }
}

fn keyword_fields(text: &str) -> ResumeFields {
    const KNOWN_SKILLS: &[&str] = &["Python", "SQL", "Rust"];

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let experience = tokens.windows(2).find_map(|pair| {
        if pair[1].to_lowercase().starts_with("year") {
            pair[0].parse::<u32>().ok()
        } else {
            None
        }
    });
    let links = tokens
        .iter()
        .map(|t| t.trim_end_matches(['.', ',']))
        .filter(|t| t.contains("github.com") || t.contains("linkedin.com"))
        .map(|t| {
            if t.starts_with("http") {
                t.to_string()
            } else {
                format!("https://{t}")
            }
        })
        .collect();

    ResumeFields {
        summary: text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default().to_string(),
        experience,
        skills: KNOWN_SKILLS
            .iter()
            .filter(|s| text.contains(*s))
            .map(|s| s.to_string())
            .collect(),
        links,
    }
}
