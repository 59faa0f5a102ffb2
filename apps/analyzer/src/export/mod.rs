// Presentation / export of batch results.
// Implements: table view, CSV export (and read-back), HTML result page.

pub mod delimited;
pub mod page;
pub mod table;

pub use delimited::{export_csv, EXPORT_FILE_NAME, EXPORT_MIME};
pub use table::{render_table, TableView};
