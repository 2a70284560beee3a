//! Column type inference.

use std::collections::HashSet;

use crate::types::{ColumnKind, RawValue, Value};

/// Columns with more than one and fewer than this many distinct values are categorical.
pub const CATEGORICAL_MAX_DISTINCT: usize = 12;

/// Infer the [`ColumnKind`] of a column from its raw values.
///
/// Rules, first match wins:
///
/// - a non-empty column made only of styled spreadsheet cells is [`ColumnKind::RawCell`]
/// - `1 < distinct < 12` is [`ColumnKind::Categorical`], numeric-looking or not
/// - all values numeric is [`ColumnKind::Numeric`] (empty strings are not numeric)
/// - anything else, including an empty column, is [`ColumnKind::Label`]
///
/// [`ColumnKind::Mixed`] is never inferred; it is assigned explicitly by callers that assemble
/// heterogeneous columns.
pub fn infer_kind(values: &[RawValue]) -> ColumnKind {
    if values.is_empty() {
        return ColumnKind::Label;
    }
    if values.iter().all(RawValue::is_cell) {
        return ColumnKind::RawCell;
    }
    infer_primitive_kind(values.iter().map(RawValue::value))
}

/// Inference over bare primitive values.
pub fn infer_primitive_kind<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnKind {
    let mut all_numeric = true;
    let mut distinct: HashSet<&Value> = HashSet::new();
    for v in values {
        all_numeric &= v.is_numeric();
        distinct.insert(v);
    }

    if distinct.is_empty() {
        return ColumnKind::Label;
    }
    if distinct.len() > 1 && distinct.len() < CATEGORICAL_MAX_DISTINCT {
        return ColumnKind::Categorical;
    }
    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Label
    }
}

#[cfg(test)]
mod tests {
    use super::infer_kind;
    use crate::types::{Cell, ColumnKind, RawValue};

    fn raws(values: &[f64]) -> Vec<RawValue> {
        values.iter().copied().map(RawValue::from).collect()
    }

    #[test]
    fn empty_column_is_label() {
        assert_eq!(infer_kind(&[]), ColumnKind::Label);
    }

    #[test]
    fn identical_numbers_are_numeric_not_categorical() {
        assert_eq!(infer_kind(&raws(&[7.0, 7.0, 7.0])), ColumnKind::Numeric);
    }

    #[test]
    fn small_cardinality_is_categorical_even_when_numeric() {
        assert_eq!(infer_kind(&raws(&[1.0, 2.0, 1.0, 3.0])), ColumnKind::Categorical);
        let text: Vec<RawValue> = ["a", "b", "a"].into_iter().map(RawValue::from).collect();
        assert_eq!(infer_kind(&text), ColumnKind::Categorical);
    }

    #[test]
    fn many_distinct_numbers_are_numeric() {
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        assert_eq!(infer_kind(&raws(&values)), ColumnKind::Numeric);

        let text: Vec<RawValue> = (0..20).map(|i| RawValue::from(format!("{i}.5"))).collect();
        assert_eq!(infer_kind(&text), ColumnKind::Numeric);
    }

    #[test]
    fn empty_string_breaks_numeric() {
        let mut values: Vec<RawValue> = (0..15).map(|i| RawValue::from(i64::from(i))).collect();
        values.push(RawValue::from(""));
        assert_eq!(infer_kind(&values), ColumnKind::Label);
    }

    #[test]
    fn free_text_is_label() {
        let values: Vec<RawValue> = (0..15).map(|i| RawValue::from(format!("row {i}"))).collect();
        assert_eq!(infer_kind(&values), ColumnKind::Label);
    }

    #[test]
    fn styled_cells_are_raw_cells() {
        let values: Vec<RawValue> = (0..3)
            .map(|i| RawValue::from(Cell::new(i64::from(i), serde_json::Value::Null)))
            .collect();
        assert_eq!(infer_kind(&values), ColumnKind::RawCell);
    }

    #[test]
    fn inference_is_deterministic() {
        let values = raws(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0, 8.0, 9.0, 7.0]);
        assert_eq!(infer_kind(&values), infer_kind(&values));
    }
}
