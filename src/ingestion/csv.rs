//! CSV loading.

use std::path::Path;

use crate::error::{ForensicsError, ForensicsResult};
use crate::types::RawValue;

/// A labelled column of raw values, as handed to [`crate::table::Table`] construction.
pub type Feeder = (String, Vec<RawValue>);

/// Load a delimited file into feeder columns.
///
/// Rules:
///
/// - the first record is the header row; every header becomes a column, in file order
/// - cells are kept as trimmed text (`"1.50"` stays `"1.50"` for n-grams); numeric text still
///   compares equal to the number it spells, so `"5"` matches a value key of `5`
/// - rows with a different field count than the header are a CSV error
pub fn load_csv_from_path(path: impl AsRef<Path>, delimiter: u8) -> ForensicsResult<Vec<Feeder>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ForensicsResult<Vec<Feeder>> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(ForensicsError::SchemaMismatch {
            message: "csv has no header row".to_string(),
        });
    }

    let mut columns: Vec<Feeder> = headers
        .iter()
        .map(|h| (h.trim().to_owned(), Vec::new()))
        .collect();

    for result in rdr.records() {
        let record = result?;
        for (idx, (_, values)) in columns.iter_mut().enumerate() {
            let raw = record.get(idx).unwrap_or("");
            values.push(RawValue::from(raw.trim()));
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::load_csv_from_reader;
    use crate::types::{RawValue, Value};

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn keeps_header_order_and_text_spelling() {
        let mut rdr = reader("amount, vendor\n1.50,acme\n 20 ,globex\n");
        let cols = load_csv_from_reader(&mut rdr).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].0, "amount");
        assert_eq!(cols[1].0, "vendor");
        assert_eq!(cols[0].1, vec![RawValue::from("1.50"), RawValue::from("20")]);
        assert_eq!(cols[0].1[0].value(), &Value::from("1.50"));
    }

    #[test]
    fn header_only_input_yields_empty_columns() {
        let mut rdr = reader("a,b\n");
        let cols = load_csv_from_reader(&mut rdr).unwrap();
        assert!(cols.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut rdr = reader("a,b\n1,2\n3\n");
        let err = load_csv_from_reader(&mut rdr).unwrap_err();
        assert!(err.to_string().contains("csv error"));
    }
}
