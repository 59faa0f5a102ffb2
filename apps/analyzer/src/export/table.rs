//! Table view of resume records. Row order equals insertion order.

use serde::Serialize;

use crate::extraction::fields::ResumeRecord;

/// Record fields first, then the originating file.
pub const COLUMNS: [&str; 5] = ["summary", "experience", "skills", "links", "file_name"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Returns `None` when there is nothing to show.
pub fn render_table(records: &[ResumeRecord]) -> Option<TableView> {
    if records.is_empty() {
        return None;
    }
    Some(TableView {
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: records.iter().map(|r| cells(r).to_vec()).collect(),
    })
}

/// Cell values for one record, in `COLUMNS` order.
/// Lists are JSON arrays so they survive a round trip through plain text.
pub(crate) fn cells(record: &ResumeRecord) -> [String; 5] {
    [
        record.summary.clone(),
        record
            .experience
            .map(|y| y.to_string())
            .unwrap_or_default(),
        list_cell(&record.skills),
        list_cell(&record.links),
        record.file_name.clone(),
    ]
}

fn list_cell(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
