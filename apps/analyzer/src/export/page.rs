//! Server-rendered HTML pages: the upload form and the batch result view.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::AppError;
use crate::export::delimited::{export_csv, EXPORT_FILE_NAME, EXPORT_MIME};
use crate::export::table::render_table;
use crate::extraction::pipeline::BatchReport;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Resume Analyzer</title>
<style>
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }
.error { color: #b00020; }
.warning { color: #8a6d00; }
.success { color: #1b5e20; }
</style>
</head>
<body>
<h1>Resume Analyzer</h1>
{body}
</body>
</html>
"#;

const UPLOAD_FORM: &str = r#"<p>Upload a ZIP file containing PDF or DOCX resumes.</p>
<form action="/analyze" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept=".zip" required>
<button type="submit">Analyze</button>
</form>"#;

pub fn render_upload_page() -> String {
    PAGE_TEMPLATE.replace("{body}", UPLOAD_FORM)
}

/// Result view: one error line per failed file, then the table and a CSV download link,
/// or a warning when nothing could be processed.
pub fn render_result_page(report: &BatchReport) -> Result<String, AppError> {
    let mut body = String::new();

    for failure in &report.failures {
        body.push_str(&format!(
            "<p class=\"error\">Error processing {}: {}</p>\n",
            escape(&failure.file_name),
            escape(&failure.message)
        ));
    }

    match (render_table(&report.records), export_csv(&report.records)?) {
        (Some(table), Some(csv)) => {
            body.push_str("<p class=\"success\">Resume analysis completed!</p>\n<table>\n<tr>");
            for column in &table.columns {
                body.push_str(&format!("<th>{}</th>", escape(column)));
            }
            body.push_str("</tr>\n");
            for row in &table.rows {
                body.push_str("<tr>");
                for cell in row {
                    body.push_str(&format!("<td>{}</td>", escape(cell)));
                }
                body.push_str("</tr>\n");
            }
            body.push_str("</table>\n");
            body.push_str(&format!(
                "<p><a download=\"{EXPORT_FILE_NAME}\" href=\"data:{EXPORT_MIME};charset=utf-8;base64,{}\">Download CSV</a></p>\n",
                STANDARD.encode(csv)
            ));
        }
        _ => body.push_str("<p class=\"warning\">No resumes could be processed.</p>\n"),
    }

    body.push_str("<p><a href=\"/\">Analyze another archive</a></p>");
    Ok(PAGE_TEMPLATE.replace("{body}", &body))
}

/// Batch-level failure (corrupt archive, bad upload).
pub fn render_error_page(message: &str) -> String {
    let body = format!(
        "<p class=\"error\">{}</p>\n<p><a href=\"/\">Try again</a></p>",
        escape(message)
    );
    PAGE_TEMPLATE.replace("{body}", &body)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fields::ResumeRecord;
    use crate::extraction::pipeline::{FailureKind, FileFailure};
    use chrono::Utc;
    use uuid::Uuid;

    fn report(records: Vec<ResumeRecord>, failures: Vec<FileFailure>) -> BatchReport {
        BatchReport {
            batch_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            records,
            failures,
            skipped: vec![],
        }
    }

    #[test]
    fn test_upload_page_has_zip_form() {
        let page = render_upload_page();
        assert!(page.contains("enctype=\"multipart/form-data\""));
        assert!(page.contains("name=\"file\""));
    }

    #[test]
    fn test_result_page_shows_table_and_download() {
        let record = ResumeRecord {
            summary: "<b>Lead</b> engineer".to_string(),
            experience: Some(9),
            skills: vec!["Rust".to_string()],
            links: vec![],
            file_name: "lead.pdf".to_string(),
        };
        let page = render_result_page(&report(vec![record], vec![])).unwrap();

        assert!(page.contains("Resume analysis completed!"));
        assert!(page.contains("<td>lead.pdf</td>"));
        assert!(page.contains("&lt;b&gt;Lead&lt;/b&gt;"));
        assert!(page.contains("download=\"resume_analysis.csv\""));
        assert!(page.contains("data:text/csv;charset=utf-8;base64,"));
    }

    #[test]
    fn test_result_page_with_only_failures_warns() {
        let failure = FileFailure {
            file_name: "jane.docx".to_string(),
            kind: FailureKind::RemoteExtraction,
            message: "operation timed out".to_string(),
        };
        let page = render_result_page(&report(vec![], vec![failure])).unwrap();

        assert!(page.contains("Error processing jane.docx: operation timed out"));
        assert_eq!(page.matches("jane.docx").count(), 1);
        assert!(page.contains("No resumes could be processed."));
        assert!(!page.contains("<table>"));
        assert!(!page.contains("Download CSV"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
