//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which loads a file into a fully materialized
//! [`crate::table::Table`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ForensicsError, ForensicsResult};
use crate::table::Table;

use super::csv::{self, Feeder};
use super::observability::{LoadContext, LoadObserver, LoadReport, LoadSeverity};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFormat {
    /// Comma-separated values (delimiter from [`LoadOptions::delimiter`]).
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl LoadFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Which sheet to load from a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Sheet(String),
}

/// Options controlling loading.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<LoadFormat>,
    /// Spreadsheet sheet choice.
    pub sheet_selection: SheetSelection,
    /// Field delimiter for [`LoadFormat::Csv`].
    pub delimiter: u8,
    /// Prepend the synthetic 1-based row-index column.
    pub index_column: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("sheet_selection", &self.sheet_selection)
            .field("delimiter", &(self.delimiter as char))
            .field("index_column", &self.index_column)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet_selection: SheetSelection::default(),
            delimiter: b',',
            index_column: true,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a dataset from `path` into a [`Table`].
///
/// Loading is one-shot: the table is returned fully built or not at all. Each load produces a
/// fresh table, so local and global selection state start empty.
///
/// When an observer is configured, this function reports:
///
/// - `on_loaded` on success, with a [`LoadReport`] of the inferred column kinds
/// - `on_failed` on failure, with a [`LoadSeverity`] from [`LoadSeverity::classify`]
/// - `on_alert` after `on_failed` when that severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use data_forensics::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), data_forensics::ForensicsError> {
/// let table = load_from_path("invoices.csv", &LoadOptions::default())?;
/// for column in table.columns() {
///     println!("{} -> {}", column.id(), column.kind());
/// }
/// # Ok(())
/// # }
/// ```
///
/// Forcing a format and logging through `tracing`:
///
/// ```no_run
/// use std::sync::Arc;
///
/// use data_forensics::ingestion::{load_from_path, LoadFormat, LoadOptions, TracingLoadObserver};
///
/// # fn main() -> Result<(), data_forensics::ForensicsError> {
/// let opts = LoadOptions {
///     format: Some(LoadFormat::Csv),
///     delimiter: b';',
///     observer: Some(Arc::new(TracingLoadObserver)),
///     ..Default::default()
/// };
/// let table = load_from_path("export_without_extension", &opts)?;
/// println!("rows={}", table.len());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> ForensicsResult<Table> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match fmt {
        LoadFormat::Csv => csv::load_csv_from_path(path, options.delimiter),
        LoadFormat::Tsv => csv::load_csv_from_path(path, b'\t'),
        LoadFormat::Excel => load_excel_dispatch(path, &options.sheet_selection),
    }
    .map(|feeders| {
        if options.index_column {
            Table::with_row_index(feeders)
        } else {
            Table::from_columns(feeders)
        }
    });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_loaded(&ctx, &LoadReport::from_table(table)),
            Err(e) => {
                let sev = LoadSeverity::classify(e);
                obs.on_failed(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn infer_format_from_path(path: &Path) -> ForensicsResult<LoadFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ForensicsError::SchemaMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    LoadFormat::from_extension(ext).ok_or_else(|| ForensicsError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

#[cfg_attr(not(feature = "excel"), allow(unused_variables))]
fn load_excel_dispatch(path: &Path, sel: &SheetSelection) -> ForensicsResult<Vec<Feeder>> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match sel {
            SheetSelection::First => excel::load_excel_from_path(path, None),
            SheetSelection::Sheet(name) => excel::load_excel_from_path(path, Some(name.as_str())),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ForensicsError::SchemaMismatch {
            message: "excel loading not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// An owned load request, for callers that queue the one-shot load as a job.
#[derive(Clone)]
pub struct LoadRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling loading.
    pub options: LoadOptions,
}

impl fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl LoadRequest {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Execute the request by calling [`load_from_path`].
    pub fn run(&self) -> ForensicsResult<Table> {
        load_from_path(&self.path, &self.options)
    }
}
