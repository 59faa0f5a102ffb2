//! CSV export of resume records.

use crate::errors::AppError;
use crate::export::table::{cells, COLUMNS};
use crate::extraction::fields::ResumeRecord;

pub const EXPORT_FILE_NAME: &str = "resume_analysis.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// UTF-8 CSV with a header row, one row per record.
/// Returns `None` when there is nothing to export.
pub fn export_csv(records: &[ResumeRecord]) -> Result<Option<Vec<u8>>, AppError> {
    if records.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(csv_error)?;
    for record in records {
        writer.write_record(cells(record)).map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to flush CSV: {}", e.error())))?;
    Ok(Some(bytes))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(anyhow::Error::new(e).context("CSV serialization failed"))
}

#[cfg(test)]
pub(crate) mod reader {
    use serde::Deserialize;

    use crate::errors::AppError;
    use crate::extraction::fields::ResumeRecord;

    #[derive(Debug, Deserialize)]
    struct CsvRow {
        summary: String,
        experience: Option<u32>,
        skills: String,
        links: String,
        file_name: String,
    }

    /// Reads back a file produced by `export_csv`.
    pub(crate) fn parse_csv(data: &[u8]) -> Result<Vec<ResumeRecord>, AppError> {
        let mut reader = csv::Reader::from_reader(data);
        let mut records = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| AppError::Validation(format!("invalid CSV row: {e}")))?;
            records.push(ResumeRecord {
                summary: row.summary,
                experience: row.experience,
                skills: list_from_cell("skills", &row.skills)?,
                links: list_from_cell("links", &row.links)?,
                file_name: row.file_name,
            });
        }
        Ok(records)
    }

    fn list_from_cell(column: &str, cell: &str) -> Result<Vec<String>, AppError> {
        if cell.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(cell)
            .map_err(|e| AppError::Validation(format!("column {column} is not a JSON list: {e}")))
    }
}
