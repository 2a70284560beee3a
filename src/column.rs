//! Typed columns and the numeric statistics view.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::inference::infer_kind;
use crate::selection::{EffectiveSelection, Facet, SelectionKey, SelectionState};
use crate::statistics::{self, LeadingDigits, NGramOptions};
use crate::types::{ColumnKind, RawValue, Value};

/// One column of a [`crate::table::Table`].
///
/// Values and kind are fixed at construction; only the local selection state changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: String,
    label: String,
    kind: ColumnKind,
    values: Vec<RawValue>,
    selection: SelectionState,
}

impl Column {
    /// Create a column, inferring its kind from `values`.
    pub fn new(id: impl Into<String>, label: impl Into<String>, values: Vec<RawValue>) -> Self {
        let kind = infer_kind(&values);
        Self::with_kind(id, label, kind, values)
    }

    /// Create a column with an explicit kind (e.g. [`ColumnKind::Mixed`] for assembled columns).
    pub fn with_kind(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ColumnKind,
        values: Vec<RawValue>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            values,
            selection: SelectionState::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn raw_values(&self) -> &[RawValue] {
        &self.values
    }

    /// Raw value at `row`.
    pub fn raw(&self, row: usize) -> Option<&RawValue> {
        self.values.get(row)
    }

    /// Primitive value at `row`.
    pub fn value(&self, row: usize) -> Option<&Value> {
        self.values.get(row).map(RawValue::value)
    }

    /// Local selection state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Local selection merged with `global`.
    pub fn effective<'a>(&'a self, global: &'a SelectionState) -> EffectiveSelection<'a> {
        EffectiveSelection::new(&self.selection, global)
    }

    /// Rows whose value is caught by the effective ignore selection, for any column kind.
    pub fn ignored_rows(&self, global: &SelectionState) -> usize {
        let selection = self.effective(global);
        self.values
            .iter()
            .filter(|v| selection.matches_value(Facet::Ignore, v.value()))
            .count()
    }

    /// Statistics view; `None` unless the column is [`ColumnKind::Numeric`].
    pub fn numeric<'a>(&'a self, global: &'a SelectionState) -> Option<NumericColumn<'a>> {
        self.kind.is_numeric().then(|| NumericColumn {
            column: self,
            selection: self.effective(global),
            order: None,
        })
    }
}

/// A numeric column seen through its effective selection.
///
/// Every statistic is recomputed by a full scan of the rows (in display order when one is set),
/// skipping rows caught by the ignore selection.
#[derive(Debug, Clone, Copy)]
pub struct NumericColumn<'a> {
    column: &'a Column,
    selection: EffectiveSelection<'a>,
    order: Option<&'a [usize]>,
}

impl<'a> NumericColumn<'a> {
    /// Iterate rows in `order` instead of natural order. Out-of-range rows are skipped.
    pub fn with_order(mut self, order: &'a [usize]) -> Self {
        self.order = Some(order);
        self
    }

    pub fn column(&self) -> &'a Column {
        self.column
    }

    pub fn selection(&self) -> EffectiveSelection<'a> {
        self.selection
    }

    fn rows(&self) -> Vec<usize> {
        match self.order {
            Some(order) => order.iter().copied().filter(|&r| r < self.column.len()).collect(),
            None => (0..self.column.len()).collect(),
        }
    }

    /// A row is ignored when its value, its leading digit, or an n-gram it contains is ignored.
    pub fn is_row_ignored(&self, row: usize) -> bool {
        self.column
            .value(row)
            .is_some_and(|v| self.selection.matches_value(Facet::Ignore, v))
    }

    /// Same rule as [`Self::is_row_ignored`] over the highlight sets.
    pub fn is_row_highlighted(&self, row: usize) -> bool {
        self.column
            .value(row)
            .is_some_and(|v| self.selection.matches_value(Facet::Highlight, v))
    }

    /// Whether a single key is ignored for this column (union rule).
    pub fn is_ignored(&self, key: &SelectionKey) -> bool {
        self.selection.is_ignored(key)
    }

    /// Values that take part in statistics, in iteration order.
    pub fn included_values(&self) -> Vec<&'a Value> {
        let column = self.column;
        self.rows()
            .into_iter()
            .filter(|&r| !self.is_row_ignored(r))
            .filter_map(|r| column.value(r))
            .collect()
    }

    /// Number of rows excluded by the ignore selection.
    pub fn ignored_rows(&self) -> usize {
        self.rows().into_iter().filter(|&r| self.is_row_ignored(r)).count()
    }

    /// Rows flagged by the highlight selection, in iteration order.
    pub fn highlighted_rows(&self) -> Vec<usize> {
        self.rows()
            .into_iter()
            .filter(|&r| self.is_row_highlighted(r))
            .collect()
    }

    pub fn duplicate_counts(&self) -> Vec<(Value, usize)> {
        let values = self.included_values();
        tracing::debug!(column = %self.column.id(), rows = values.len(), "duplicate counts");
        statistics::duplicate_counts(values)
    }

    pub fn replicate_histogram(&self) -> Vec<(usize, usize)> {
        statistics::replicate_histogram(&self.duplicate_counts())
    }

    pub fn leading_digits(&self) -> LeadingDigits {
        let values = self.included_values();
        tracing::debug!(column = %self.column.id(), rows = values.len(), "leading digits");
        LeadingDigits::from_values(values)
    }

    pub fn ngram_frequencies(&self, opts: NGramOptions) -> Vec<(String, usize)> {
        let values = self.included_values();
        tracing::debug!(
            column = %self.column.id(),
            rows = values.len(),
            n = opts.n,
            lsd = opts.lsd,
            "n-gram frequencies"
        );
        statistics::ngram_frequencies(values, opts)
    }

    /// All four statistics in one serializable bundle.
    pub fn summary(&self, opts: NGramOptions) -> ColumnStatistics {
        let duplicates = self.duplicate_counts();
        let replicates = statistics::replicate_histogram(&duplicates);
        let digits = self.leading_digits();
        ColumnStatistics {
            id: self.column.id().to_string(),
            kind: self.column.kind(),
            ignored_rows: self.ignored_rows(),
            duplicates,
            replicates,
            leading_digits: digits.frequencies(),
            ngram_options: opts,
            ngrams: self.ngram_frequencies(opts),
        }
    }
}

/// Snapshot of a numeric column's statistics, ready to ship to a chart layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub id: String,
    pub kind: ColumnKind,
    pub ignored_rows: usize,
    pub duplicates: Vec<(Value, usize)>,
    pub replicates: Vec<(usize, usize)>,
    pub leading_digits: BTreeMap<char, f64>,
    pub ngram_options: NGramOptions,
    pub ngrams: Vec<(String, usize)>,
}
