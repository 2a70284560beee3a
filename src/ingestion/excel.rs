#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{ForensicsError, ForensicsResult};
use crate::types::RawValue;

use super::csv::Feeder;

/// Load one sheet of a spreadsheet (`.xlsx`, `.xls`, `.ods`, etc.) into feeder columns.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row; every header cell becomes a column
/// - Numbers (and date serials) become numeric values, everything else text
pub fn load_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> ForensicsResult<Vec<Feeder>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ForensicsError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    load_sheet_range(&range).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))
}

fn load_sheet_range(range: &calamine::Range<Data>) -> ForensicsResult<Vec<Feeder>> {
    let (header_row_idx, headers) = find_header_row(range)?;

    let mut columns: Vec<Feeder> = headers.into_iter().map(|h| (h, Vec::new())).collect();
    for row in range.rows().skip(header_row_idx + 1) {
        for (idx, (_, values)) in columns.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            values.push(convert_cell(cell));
        }
    }
    Ok(columns)
}

fn wrap_schema_err_with_sheet(sheet: &str, err: ForensicsError) -> ForensicsError {
    match err {
        ForensicsError::SchemaMismatch { message } => ForensicsError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn find_header_row(range: &calamine::Range<Data>) -> ForensicsResult<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(cell_to_header_string).collect()))
        .ok_or_else(|| ForensicsError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> RawValue {
    match c {
        Data::Int(i) => RawValue::from(*i),
        Data::Float(f) => RawValue::from(*f),
        Data::DateTime(dt) => RawValue::from(dt.as_f64()),
        Data::String(s) => RawValue::from(s.trim()),
        Data::Bool(b) => RawValue::from(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::from(s.as_str()),
        Data::Error(e) => RawValue::from(format!("{e:?}")),
        Data::Empty => RawValue::from(""),
    }
}
