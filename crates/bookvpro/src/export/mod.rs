//! Output formats for classification results.

pub mod html;
pub mod spreadsheet;

pub use html::{render_results_page, render_results_table};
pub use spreadsheet::{
    spreadsheet_response, write_csv, write_spreadsheet, write_xlsx, ExportError,
    SpreadsheetFormat,
};
