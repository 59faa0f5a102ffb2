//! Batch Pipeline: archive bytes in, resume records and per-file failures out.
//!
//! Files are processed one at a time. A failing file never aborts the batch; only an
//! unreadable archive does.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::archive::{self, ArchiveMember, UnpackedArchive};
use crate::extraction::fields::{FieldExtractor, ResumeRecord};
use crate::extraction::text::{self, DocumentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnreadableDocument,
    RemoteExtraction,
}

/// Why one archive member produced no record. `message` is the bare reason.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    fn unreadable(file_name: &str, reason: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind: FailureKind::UnreadableDocument,
            message: reason,
        }
    }

    fn remote(file_name: &str, reason: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            kind: FailureKind::RemoteExtraction,
            message: reason,
        }
    }

    /// The failure as the error the pipeline reports it under.
    pub fn to_error(&self) -> AppError {
        let file_name = self.file_name.clone();
        let reason = self.message.clone();
        match self.kind {
            FailureKind::UnreadableDocument => AppError::UnreadableDocument { file_name, reason },
            FailureKind::RemoteExtraction => AppError::RemoteExtraction { file_name, reason },
        }
    }
}

/// Terminal state of one archive member.
#[derive(Debug)]
pub enum FileOutcome {
    Extracted(ResumeRecord),
    Failed(FileFailure),
    Skipped(String),
}

/// Everything one batch produced. Records keep processing order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records: Vec<ResumeRecord>,
    pub failures: Vec<FileFailure>,
    /// Members ignored because of their extension. Never reported as failures.
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Runs one batch over an uploaded zip archive.
///
/// Returns `CorruptArchive` before any file is attempted if the upload cannot be opened.
/// The temporary directory is gone by the time this returns.
pub async fn run_batch(
    archive_bytes: Bytes,
    extractor: &dyn FieldExtractor,
) -> Result<BatchReport, AppError> {
    let batch_id = Uuid::new_v4();
    let span = info_span!("batch", %batch_id, backend = extractor.backend());

    async move {
        let started_at = Utc::now();
        info!("Unpacking archive ({} bytes)", archive_bytes.len());

        let unpacked = tokio::task::spawn_blocking(move || archive::unpack(&archive_bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("unpack task failed: {e}")))??;
        debug!(dir = %unpacked.root().display(), "Archive unpacked");

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut skipped = Vec::new();

        for member in unpacked.members() {
            match process_member(member, extractor).await {
                FileOutcome::Extracted(record) => records.push(record),
                FileOutcome::Failed(failure) => {
                    warn!("{}", failure.to_error());
                    failures.push(failure);
                }
                FileOutcome::Skipped(name) => skipped.push(name),
            }
        }

        // Remove the temporary directory before the batch is reported done.
        discard(unpacked).await?;

        info!(
            "Batch done: {} records, {} failures, {} skipped",
            records.len(),
            failures.len(),
            skipped.len()
        );

        Ok(BatchReport {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            records,
            failures,
            skipped,
        })
    }
    .instrument(span)
    .await
}

/// Deletes the extraction directory on the blocking pool.
async fn discard(unpacked: UnpackedArchive) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || drop(unpacked))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cleanup task failed: {e}")))
}

/// Detected → TextExtracted → FieldsExtracted, or Failed at any step.
async fn process_member(member: &ArchiveMember, extractor: &dyn FieldExtractor) -> FileOutcome {
    let Some(kind) = DocumentKind::from_file_name(&member.name) else {
        debug!(file = %member.name, "Skipping unsupported member");
        return FileOutcome::Skipped(member.name.clone());
    };

    let path = member.path.clone();
    // Parser panics surface as a JoinError and count as an unreadable document.
    let text = match tokio::task::spawn_blocking(move || text::extract_text(&path, kind)).await {
        Ok(Ok(text)) => text,
        Ok(Err(AppError::UnreadableDocument { reason, .. })) => {
            return FileOutcome::Failed(FileFailure::unreadable(&member.name, reason));
        }
        Ok(Err(other)) => {
            return FileOutcome::Failed(FileFailure::unreadable(&member.name, other.to_string()));
        }
        Err(e) => {
            return FileOutcome::Failed(FileFailure::unreadable(
                &member.name,
                format!("parser aborted: {e}"),
            ));
        }
    };
    debug!(file = %member.name, chars = text.len(), "Text extracted");

    match extractor.extract_fields(&text).await {
        Ok(fields) => {
            debug!(file = %member.name, "Fields extracted");
            FileOutcome::Extracted(ResumeRecord::new(fields, member.name.clone()))
        }
        Err(e) => FileOutcome::Failed(FileFailure::remote(&member.name, e.to_string())),
    }
}
