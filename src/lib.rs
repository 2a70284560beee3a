//! `data-forensics` is a column statistics engine for spotting data-quality anomalies in tabular
//! data, together with the ignore/highlight selection model that drives it.
//!
//! A dataset is loaded into a [`table::Table`]; every column gets a [`types::ColumnKind`] by
//! inference, and numeric columns expose four statistics:
//!
//! - **duplicate counts**: how often each value occurs, most frequent first
//! - **replicate histogram**: how many values occur exactly 2, 3, ... times
//! - **leading digits**: first significant digit distribution, for Benford's-law checks
//! - **n-grams**: fixed-length substring frequencies, optionally from the decimal point onward
//!
//! Users mark values, n-grams or leading digits as *ignored* (excluded from statistics) or
//! *highlighted* (flagged only), either for one column (local) or for the whole table (global).
//! Every statistic read is a fresh full scan that consults the current selection.
//!
//! ## What you can load
//!
//! - **CSV / TSV**: `.csv`, `.tsv`
//! - **Excel/workbooks** (requires the Cargo feature `excel`): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//!
//! ```no_run
//! use data_forensics::ingestion::{load_from_path, LoadOptions};
//! use data_forensics::statistics::NGramOptions;
//!
//! # fn main() -> Result<(), data_forensics::ForensicsError> {
//! let table = load_from_path("ledger.csv", &LoadOptions::default())?;
//! if let Some(amount) = table.numeric("amount") {
//!     let digits = amount.leading_digits();
//!     println!("MAD vs Benford: {:.4}", digits.mean_absolute_deviation());
//!     println!("{:?}", amount.ngram_frequencies(NGramOptions { n: 2, lsd: true }));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Selection example
//!
//! ```rust
//! use data_forensics::selection::{Scope, SelectionKey};
//! use data_forensics::table::Table;
//! use data_forensics::types::{RawValue, Value};
//!
//! let amounts: Vec<RawValue> = [5_i64, 5, 3, 5, 2, 11, 12, 13, 14, 15, 16, 17, 18, 19]
//!     .into_iter()
//!     .map(RawValue::from)
//!     .collect();
//! let mut table = Table::with_row_index(vec![("amount", amounts)]);
//!
//! let counts = table.numeric("amount").unwrap().duplicate_counts();
//! assert_eq!(counts[0], (Value::from(5), 3));
//!
//! // Ignore 5 everywhere.
//! table.ignore(&Scope::Global, SelectionKey::value(5)).unwrap();
//! let counts = table.numeric("amount").unwrap().duplicate_counts();
//! assert_eq!(counts[0], (Value::from(3), 1));
//! assert!(table.is_ignored("amount", &SelectionKey::value(5)));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: values, cells and column kinds
//! - [`inference`]: column type inference
//! - [`selection`]: ignore/highlight sets, scopes, change notifications, UI events
//! - [`column`]: typed columns and the numeric statistics view
//! - [`table`]: the table and selection mutation entry points
//! - [`statistics`]: the four statistics as pure functions
//! - [`ingestion`]: CSV/Excel loaders
//! - [`error`]: error types

pub mod column;
pub mod error;
pub mod inference;
pub mod ingestion;
pub mod selection;
pub mod statistics;
pub mod table;
pub mod types;

pub use error::{ForensicsError, ForensicsResult};
