use std::path::Path;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Deserialize;

use crate::error::AppError;
use crate::workflows::grading::ClassificationRecord;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "result";

const HEADER: [&str; 6] = [
    "title",
    "search_volume",
    "seller_count",
    "has_card",
    "grade",
    "link",
];

/// Lets spreadsheet applications detect UTF-8 (titles are mostly Hangul).
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Download format, selected with `?format=` on the download routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    pub fn filename(self) -> &'static str {
        match self {
            SpreadsheetFormat::Xlsx => "result.xlsx",
            SpreadsheetFormat::Csv => "result.csv",
        }
    }

    pub fn content_type(self) -> String {
        match self {
            SpreadsheetFormat::Xlsx => XLSX_CONTENT_TYPE.to_string(),
            SpreadsheetFormat::Csv => mime::TEXT_CSV_UTF_8.to_string(),
        }
    }

    /// `.csv` paths get CSV, anything else the workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SpreadsheetFormat::Csv,
            _ => SpreadsheetFormat::Xlsx,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Xlsx(#[from] XlsxError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("spreadsheet buffer unavailable: {0}")]
    Buffer(String),
}

pub fn write_spreadsheet(
    records: &[ClassificationRecord],
    format: SpreadsheetFormat,
) -> Result<Vec<u8>, ExportError> {
    match format {
        SpreadsheetFormat::Xlsx => write_xlsx(records),
        SpreadsheetFormat::Csv => write_csv(records),
    }
}

/// Single-sheet workbook: bold header row, one row per record.
pub fn write_xlsx(records: &[ClassificationRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, name) in (0u16..).zip(HEADER) {
        sheet.write_string_with_format(0, col, name, &bold)?;
    }

    for (row, record) in (1u32..).zip(records) {
        sheet.write_string(row, 0, &record.title)?;
        sheet.write_number(row, 1, record.search_volume as f64)?;
        sheet.write_number(row, 2, record.seller_count)?;
        sheet.write_boolean(row, 3, record.has_card)?;
        sheet.write_string(row, 4, record.grade.label())?;
        sheet.write_string(row, 5, &record.link)?;
    }
    sheet.set_column_width(0, 40)?;

    Ok(workbook.save_to_buffer()?)
}

/// CSV sheet with a BOM and fixed header row.
pub fn write_csv(records: &[ClassificationRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))
}

/// Attachment response carrying the spreadsheet.
pub fn spreadsheet_response(
    records: &[ClassificationRecord],
    format: SpreadsheetFormat,
) -> Result<Response, AppError> {
    let body = write_spreadsheet(records, format)?;
    let disposition = format!("attachment; filename=\"{}\"", format.filename());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
