//! Load outcome reporting.
//!
//! [`super::load_from_path`] tells the configured [`LoadObserver`] how each attempt ended: a
//! [`LoadReport`] listing the columns and their inferred kinds on success, or a
//! [`LoadSeverity`] plus the error on failure.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ForensicsError;
use crate::table::Table;
use crate::types::ColumnKind;

use super::unified::LoadFormat;

/// How bad a failed load is; alerts fire at or above [`super::LoadOptions::alert_at_or_above`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// The input could not be turned into a table (bad shape, parse error, unknown format).
    Error,
    /// The input could not be read at all.
    Critical,
}

impl LoadSeverity {
    /// I/O anywhere in the error chain is critical; everything else is an input error.
    pub fn classify(error: &ForensicsError) -> Self {
        let io = match error {
            ForensicsError::Io(_) => true,
            ForensicsError::Csv(err) => matches!(err.kind(), ::csv::ErrorKind::Io(_)),
            #[cfg(feature = "excel")]
            ForensicsError::Excel(err) => chain_has_io(err),
            _ => false,
        };
        if io { Self::Critical } else { Self::Error }
    }
}

#[cfg_attr(not(feature = "excel"), allow(dead_code))]
fn chain_has_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Which file was loaded, and as what.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub path: PathBuf,
    pub format: LoadFormat,
}

/// One column of a freshly loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub id: String,
    pub kind: ColumnKind,
}

/// Shape of a freshly loaded table: row count plus every column's inferred kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
}

impl LoadReport {
    pub fn from_table(table: &Table) -> Self {
        Self {
            rows: table.len(),
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnReport {
                    id: c.id().to_string(),
                    kind: c.kind(),
                })
                .collect(),
        }
    }

    /// Number of columns of `kind`.
    pub fn count_of(&self, kind: ColumnKind) -> usize {
        self.columns.iter().filter(|c| c.kind == kind).count()
    }

    /// Ids of the columns that get statistics.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.id.as_str())
            .collect()
    }
}

/// Receives load outcomes. Every method defaults to doing nothing.
pub trait LoadObserver: Send + Sync {
    fn on_loaded(&self, _ctx: &LoadContext, _report: &LoadReport) {}

    fn on_failed(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &ForensicsError) {}

    /// Failure at or above the alert threshold; reported after [`Self::on_failed`].
    fn on_alert(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &ForensicsError) {}
}

/// Forwards every outcome to each inner observer, in order.
#[derive(Default)]
pub struct CompositeLoadObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeLoadObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn LoadObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeLoadObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeLoadObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeLoadObserver {
    fn on_loaded(&self, ctx: &LoadContext, report: &LoadReport) {
        self.each(|o| o.on_loaded(ctx, report));
    }

    fn on_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ForensicsError) {
        self.each(|o| o.on_failed(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ForensicsError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Logs load outcomes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingLoadObserver;

impl LoadObserver for TracingLoadObserver {
    fn on_loaded(&self, ctx: &LoadContext, report: &LoadReport) {
        tracing::info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = report.rows,
            columns = report.columns.len(),
            numeric = %report.numeric_columns().join(","),
            categorical = report.count_of(ColumnKind::Categorical),
            "dataset loaded"
        );
    }

    fn on_failed(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ForensicsError) {
        tracing::warn!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "dataset load failed");
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ForensicsError) {
        tracing::error!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "dataset load alert");
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadReport, LoadSeverity};
    use crate::error::ForensicsError;
    use crate::table::{Table, ROW_INDEX_ID};
    use crate::types::{ColumnKind, RawValue};

    #[test]
    fn report_lists_kinds_in_column_order() {
        let amounts: Vec<RawValue> = (0..12_i64).map(RawValue::from).collect();
        let vendors: Vec<RawValue> = (0..12).map(|i| RawValue::from(["acme", "globex"][i % 2])).collect();
        let table = Table::with_row_index(vec![("amount", amounts), ("vendor", vendors)]);

        let report = LoadReport::from_table(&table);
        assert_eq!(report.rows, 12);
        assert_eq!(report.numeric_columns(), vec![ROW_INDEX_ID, "amount"]);
        assert_eq!(report.count_of(ColumnKind::Categorical), 1);
        assert_eq!(report.columns[2].id, "vendor");
    }

    #[test]
    fn io_errors_are_critical() {
        let io = ForensicsError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(LoadSeverity::classify(&io), LoadSeverity::Critical);

        let shape = ForensicsError::SchemaMismatch {
            message: "no header".to_string(),
        };
        assert_eq!(LoadSeverity::classify(&shape), LoadSeverity::Error);
        assert!(LoadSeverity::Critical > LoadSeverity::Error);
    }
}
