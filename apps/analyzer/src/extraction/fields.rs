//! Structured Field Extractor: asks the model for resume fields and validates the answer.
//!
//! The remote payload is never trusted: `coerce_fields` turns an arbitrary JSON value
//! into `ResumeFields` or rejects it.
//!
//! `AppState` holds an `Arc<dyn FieldExtractor>`; tests swap in stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::extraction::prompts::{RESUME_EXTRACT_PROMPT, RESUME_EXTRACT_SYSTEM};
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError, OutputSchema};

const SCHEMA_NAME: &str = "resume_schema";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Fields the model produces for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFields {
    pub summary: String,
    pub experience: Option<u32>,
    pub skills: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// One row of batch output: the model's fields plus the archive member they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub summary: String,
    pub experience: Option<u32>,
    pub skills: Vec<String>,
    pub links: Vec<String>,
    pub file_name: String,
}

impl ResumeRecord {
    pub fn new(fields: ResumeFields, file_name: impl Into<String>) -> Self {
        Self {
            summary: fields.summary,
            experience: fields.experience,
            skills: fields.skills,
            links: fields.links,
            file_name: file_name.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model call failed: {0}")]
    Remote(#[from] LlmError),

    #[error("response does not match the resume schema: {0}")]
    Schema(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Maps raw resume text to validated fields. One call per file, no retries.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract_fields(&self, text: &str) -> Result<ResumeFields, ExtractError>;

    /// Identifier for logs.
    fn backend(&self) -> &str;
}

/// Default backend: the configured remote model.
pub struct LlmFieldExtractor {
    llm: LlmClient,
    system: String,
    schema: Value,
}

impl LlmFieldExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{RESUME_EXTRACT_SYSTEM} {NO_INVENTION_INSTRUCTION}"),
            schema: resume_schema(),
        }
    }
}

#[async_trait]
impl FieldExtractor for LlmFieldExtractor {
    async fn extract_fields(&self, text: &str) -> Result<ResumeFields, ExtractError> {
        let prompt = RESUME_EXTRACT_PROMPT.replace("{resume_text}", text);
        let raw: Value = self
            .llm
            .call_json(
                &prompt,
                &self.system,
                Some(OutputSchema {
                    name: SCHEMA_NAME,
                    schema: &self.schema,
                }),
            )
            .await?;
        coerce_fields(raw).map_err(ExtractError::Schema)
    }

    fn backend(&self) -> &str {
        self.llm.model()
    }
}

/// JSON schema sent with every request. Mirrors `ResumeFields`.
pub fn resume_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "Short professional summary"
            },
            "experience": {
                "type": ["integer", "null"],
                "description": "Years of experience if mentioned"
            },
            "skills": {
                "type": "array",
                "items": {"type": "string"},
                "description": "List of technical skills"
            },
            "links": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Any URLs like LinkedIn or GitHub"
            }
        },
        "required": ["summary", "experience", "skills", "links"],
        "additionalProperties": false
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Validation / coercion
// ────────────────────────────────────────────────────────────────────────────

/// Validates a model response against the resume shape.
///
/// Coercions: integral floats and numeric strings become `experience`, a missing or
/// null `links` becomes an empty list. Everything else must already have the right type.
pub fn coerce_fields(raw: Value) -> Result<ResumeFields, String> {
    let kind = type_name(&raw);
    let Value::Object(mut obj) = raw else {
        return Err(format!("expected a JSON object, got {kind}"));
    };

    let summary = match obj.remove("summary") {
        Some(Value::String(s)) => s,
        Some(other) => return Err(format!("summary must be a string, got {}", type_name(&other))),
        None => return Err("summary is required".to_string()),
    };

    let experience = coerce_experience(obj.remove("experience"))?;
    let skills = match obj.remove("skills") {
        Some(v) => string_list("skills", v)?,
        None => return Err("skills is required".to_string()),
    };
    let links = match obj.remove("links") {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => string_list("links", v)?,
    };

    Ok(ResumeFields {
        summary,
        experience,
        skills,
        links,
    })
}

fn coerce_experience(value: Option<Value>) -> Result<Option<u32>, String> {
    let invalid = |v: &Value| format!("experience must be a non-negative integer or null, got {v}");
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                return u32::try_from(u).map(Some).map_err(|_| invalid(&Value::Number(n)));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
                    Ok(Some(f as u32))
                }
                _ => Err(invalid(&Value::Number(n))),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| invalid(&Value::String(s))),
        Some(other) => Err(invalid(&other)),
    }
}

fn string_list(field: &str, value: Value) -> Result<Vec<String>, String> {
    let kind = type_name(&value);
    let Value::Array(items) = value else {
        return Err(format!("{field} must be a list of strings, got {kind}"));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s),
            other => Err(format!("{field}[{i}] must be a string, got {}", type_name(&other))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
