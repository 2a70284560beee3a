//! Core data model types.
//!
//! Loaders produce columns of [`RawValue`]s. Every raw value exposes a primitive [`Value`],
//! which is what inference, statistics and selection keys operate on.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Semantic kind of a column, chosen once by inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    /// Every value is numeric and the column is not small-cardinality.
    Numeric,
    /// More than one and fewer than 12 distinct values.
    Categorical,
    /// Free text fallback.
    Label,
    /// Programmatically assembled heterogeneous column.
    Mixed,
    /// Spreadsheet cells carrying a primitive value plus style metadata.
    RawCell,
}

impl ColumnKind {
    /// Lower-case name, handy for renderer dispatch tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Label => "label",
            Self::Mixed => "mixed",
            Self::RawCell => "rawCell",
        }
    }

    /// Only numeric columns expose duplicate/replicate/leading-digit/n-gram statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive cell value: a number or a string.
///
/// Equality and hashing compare numbers by value: text that parses as a number equals that
/// number, so `Number(5.0)`, `"5"` and `"5.0"` are one key. `0.0` and `-0.0` are the same key,
/// and all NaNs are the same key. Non-numeric text compares by its exact spelling.
///
/// Text keeps its spelling for display and n-grams even when it compares numerically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric value.
    Number(f64),
    /// Text value, kept verbatim (trailing zeros and all).
    Text(String),
}

impl Value {
    /// Returns the numeric interpretation of this value, if any.
    ///
    /// Text is trimmed and parsed; the empty string and `NaN` are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => parse_numeric(s),
        }
    }

    /// Whether [`Self::as_number`] succeeds.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// String form of the absolute value, used for leading-digit extraction.
    ///
    /// Numbers are formatted after `abs()`. Text keeps its spelling with a leading sign removed.
    pub fn abs_string(&self) -> String {
        match self {
            Self::Number(n) => n.abs().to_string(),
            Self::Text(s) => {
                let t = s.trim();
                t.strip_prefix(['-', '+']).unwrap_or(t).to_string()
            }
        }
    }

    /// Normalized bits of the numeric interpretation, `None` for non-numeric text.
    fn numeric_key(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(Self::key_bits(*n)),
            Self::Text(s) => parse_numeric(s).map(Self::key_bits),
        }
    }

    fn key_bits(n: f64) -> u64 {
        if n == 0.0 {
            0.0f64.to_bits()
        } else if n.is_nan() {
            f64::NAN.to_bits()
        } else {
            n.to_bits()
        }
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| !n.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.numeric_key(), other.numeric_key()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => matches!((self, other), (Self::Text(a), Self::Text(b)) if a == b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.numeric_key() {
            Some(bits) => {
                0u8.hash(state);
                bits.hash(state);
            }
            None => {
                1u8.hash(state);
                if let Self::Text(s) = self {
                    s.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A spreadsheet cell: a primitive value plus style metadata.
///
/// The style is opaque to this crate and passed through unexamined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Primitive cell value.
    pub value: Value,
    /// Opaque style payload (fonts, fills, number formats, ...).
    #[serde(default)]
    pub style: serde_json::Value,
}

impl Cell {
    /// Create a cell with a style payload.
    pub fn new(value: impl Into<Value>, style: serde_json::Value) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }
}

/// A value as handed over by a loader: a bare primitive or a styled spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A bare number or string.
    Plain(Value),
    /// A styled spreadsheet cell.
    Cell(Cell),
}

impl RawValue {
    /// The primitive value, regardless of representation.
    pub fn value(&self) -> &Value {
        match self {
            Self::Plain(v) => v,
            Self::Cell(c) => &c.value,
        }
    }

    /// Style payload for cells; `None` for plain values.
    pub fn style(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Plain(_) => None,
            Self::Cell(c) => Some(&c.style),
        }
    }

    /// Whether this is a styled cell.
    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell(_))
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        Self::Plain(v)
    }
}

macro_rules! plain_raw_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(v: $t) -> Self {
                    Self::Plain(Value::from(v))
                }
            }
        )*
    };
}

plain_raw_from!(f64, i64, i32, &str, String);

impl From<Cell> for RawValue {
    fn from(c: Cell) -> Self {
        Self::Cell(c)
    }
}
