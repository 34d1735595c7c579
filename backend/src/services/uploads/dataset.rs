use std::collections::HashMap;
use std::io::Cursor;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use common::model::upload::UploadedDataset;

use crate::error::ApiError;
use crate::state::AppState;

const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Rows shown in the upload preview.
const PREVIEW_ROWS: usize = 5;

/// Handler for `POST /upload/excel`.
///
/// The file is stored before parsing: a malformed dataset is reported as a
/// parse error but remains in the upload store.
pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let (raw_name, bytes) = super::read_file_field(payload).await?;
    let filename = super::sanitize_filename(&raw_name)?.to_string();

    if !super::has_allowed_extension(&filename, &ALLOWED_EXTENSIONS) {
        return Err(ApiError::Validation("file must be Excel or CSV".into()));
    }

    let key = format!("excel/{filename}");
    state.uploads.put(&key, &bytes)?;

    let dataset = parse_dataset(&filename, &bytes)?;
    log::info!("stored dataset {key} ({} rows)", dataset.rows.len());

    Ok(HttpResponse::Ok().json(UploadedDataset {
        filename,
        path: format!("uploads/{key}"),
        columns: dataset.columns.clone(),
        preview: dataset.preview(PREVIEW_ROWS),
        total_rows: dataset.rows.len(),
    }))
}

/// Parsed tabular data: ordered header columns plus rows of string cells.
///
/// Shared with the batch generator, which re-parses the stored file at
/// generation time.
#[derive(Debug)]
pub(crate) struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The first `limit` rows as column-name to value maps. Cells missing
    /// from a short row read as empty strings.
    pub fn preview(&self, limit: usize) -> Vec<HashMap<String, String>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, col)| (col.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect()
    }
}

/// Parse CSV with the `csv` crate, anything else with `calamine`.
pub(crate) fn parse_dataset(filename: &str, bytes: &[u8]) -> Result<Dataset, ApiError> {
    if filename.to_ascii_lowercase().ends_with(".csv") {
        parse_csv(bytes)
    } else {
        parse_workbook(bytes)
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Dataset, ApiError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let columns = reader
        .headers()
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ApiError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Dataset { columns, rows })
}

fn parse_workbook(bytes: &[u8]) -> Result<Dataset, ApiError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| ApiError::Parse(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ApiError::Parse("workbook has no sheets".into()))?
        .map_err(|e| ApiError::Parse(e.to_string()))?;

    let mut rows_iter = range.rows();
    let columns = rows_iter
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let rows = rows_iter
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(Dataset { columns, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
