//! Fixed-length n-gram frequencies.

use serde::{Deserialize, Serialize};

use crate::error::{ForensicsError, ForensicsResult};
use crate::types::Value;

use super::OrderedCounter;

/// Decimal separator recognized by n-gram windowing.
pub const DECIMAL_SEPARATOR: char = '.';

/// N-gram extraction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NGramOptions {
    /// Window length in digits; the decimal separator does not count toward it.
    pub n: usize,
    /// Least-significant-digit mode: only the region from the decimal point onward.
    pub lsd: bool,
}

impl NGramOptions {
    /// Validated constructor; `n` must be at least 1.
    pub fn new(n: usize, lsd: bool) -> ForensicsResult<Self> {
        if n == 0 {
            return Err(ForensicsError::InvalidNGramLength);
        }
        Ok(Self { n, lsd })
    }
}

impl Default for NGramOptions {
    fn default() -> Self {
        Self { n: 2, lsd: false }
    }
}

/// N-grams of one string, left to right.
///
/// Windowing rules:
///
/// - with `lsd`, strings without a decimal point yield nothing, others are cut to start at it
/// - strings shorter than `n` yield nothing
/// - a window that contains the separator is one character wider, so it still holds `n`
///   non-separator characters; windows running past the end are dropped
/// - after a window starting on the separator, the next position is skipped
pub fn ngrams_of(text: &str, opts: NGramOptions) -> Vec<String> {
    let region = if opts.lsd {
        match text.find(DECIMAL_SEPARATOR) {
            Some(pos) => &text[pos..],
            None => return Vec::new(),
        }
    } else {
        text
    };

    let chars: Vec<char> = region.chars().collect();
    let n = opts.n;
    if n == 0 || chars.len() < n {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let plain_end = (i + n).min(chars.len());
        let width = if chars[i..plain_end].contains(&DECIMAL_SEPARATOR) {
            n + 1
        } else {
            n
        };
        if i + width <= chars.len() {
            out.push(chars[i..i + width].iter().collect());
        }
        if chars[i] == DECIMAL_SEPARATOR {
            i += 1;
        }
        i += 1;
    }
    out
}

/// Count n-grams over the string forms of `values`.
///
/// Output is sorted by count descending, ties in first-seen order.
pub fn ngram_frequencies<'a>(
    values: impl IntoIterator<Item = &'a Value>,
    opts: NGramOptions,
) -> Vec<(String, usize)> {
    let mut counter = OrderedCounter::new();
    for v in values {
        for gram in ngrams_of(&v.to_string(), opts) {
            counter.add(gram);
        }
    }
    counter.into_sorted_desc()
}
