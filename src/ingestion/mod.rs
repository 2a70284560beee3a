//! Dataset loading.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`LoadOptions`])
//! - builds a fully materialized [`crate::table::Table`] in one shot
//! - optionally reports the loaded column kinds, or the failure, to a [`LoadObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    ColumnReport, CompositeLoadObserver, LoadContext, LoadObserver, LoadReport, LoadSeverity,
    TracingLoadObserver,
};
pub use unified::{load_from_path, LoadFormat, LoadOptions, LoadRequest, SheetSelection};
