//! Axum route handlers for the resume analysis API and pages.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::page::{render_error_page, render_result_page, render_upload_page};
use crate::export::{export_csv, render_table, TableView, EXPORT_FILE_NAME, EXPORT_MIME};
use crate::extraction::fields::ResumeRecord;
use crate::extraction::pipeline::{run_batch, FileFailure};
use crate::state::AppState;

/// Multipart field carrying the zip archive.
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub batch_id: Uuid,
    pub records: Vec<ResumeRecord>,
    /// `None` when no resume could be processed.
    pub table: Option<TableView>,
    pub failures: Vec<FileFailure>,
    pub skipped: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_upload_page())
}

/// POST /analyze
///
/// Browser flow: multipart upload in, HTML result page out.
pub async fn handle_analyze_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let outcome: Result<String, AppError> = async {
        let archive = read_upload(multipart).await?;
        let report = run_batch(archive, state.extractor.as_ref()).await?;
        render_result_page(&report)
    }
    .await;

    match outcome {
        Ok(page) => Html(page).into_response(),
        Err(e) => (e.status(), Html(render_error_page(&e.public_message()))).into_response(),
    }
}

/// POST /api/v1/resumes/analyze
///
/// Runs a batch and returns records, table view and per-file failures as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let archive = read_upload(multipart).await?;
    let report = run_batch(archive, state.extractor.as_ref()).await?;

    Ok(Json(AnalyzeResponse {
        batch_id: report.batch_id,
        table: render_table(&report.records),
        records: report.records,
        failures: report.failures,
        skipped: report.skipped,
    }))
}

/// POST /api/v1/resumes/export
///
/// Runs a batch and returns the records as a CSV download.
/// 422 when no resume could be processed.
pub async fn handle_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let archive = read_upload(multipart).await?;
    let report = run_batch(archive, state.extractor.as_ref()).await?;

    if !report.has_records() {
        return Err(AppError::NothingToShow);
    }
    let csv = export_csv(&report.records)?.ok_or(AppError::NothingToShow)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Pulls the archive bytes out of the `file` field.
async fn read_upload(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| multipart_error("Failed to read upload", e));
        }
    }
    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field with the zip archive"
    )))
}

/// Body-limit rejections keep their 413; everything else is a malformed request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}
