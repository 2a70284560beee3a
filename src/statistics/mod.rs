//! Per-column statistics.
//!
//! Every function here is a pure full scan over the values it is given. Callers decide which
//! values take part; [`crate::column::NumericColumn`] feeds them the rows of a numeric column in
//! display order, minus the rows caught by the effective ignore selection.
//!
//! Currently implemented:
//!
//! - [`duplicate_counts()`]: value counts, most frequent first
//! - [`replicate_histogram()`]: how many values repeat 2, 3, ... times
//! - [`LeadingDigits`]: first significant digit distribution (Benford checks)
//! - [`ngram_frequencies()`]: fixed-length substring counts, optionally from the decimal point on
//!
//! ## Example
//!
//! ```rust
//! use data_forensics::statistics::{duplicate_counts, replicate_histogram};
//! use data_forensics::types::Value;
//!
//! let values: Vec<Value> = [1_i64, 1, 2, 2, 2, 3].into_iter().map(Value::from).collect();
//! let counts = duplicate_counts(&values);
//! assert_eq!(counts[0], (Value::from(2_i64), 3));
//! assert_eq!(replicate_histogram(&counts), vec![(2, 1), (3, 1)]);
//! ```

pub mod duplicates;
pub mod leading_digit;
pub mod ngram;
pub mod replicates;

use std::collections::HashMap;
use std::hash::Hash;

pub use duplicates::duplicate_counts;
pub use leading_digit::{benford_expected, leading_digit, leading_digit_in, LeadingDigits, DIGITS};
pub use ngram::{ngram_frequencies, ngrams_of, NGramOptions};
pub use replicates::replicate_histogram;

/// Insertion-ordered counter.
///
/// Sorting the entries by count with a stable sort keeps first-seen order among ties.
#[derive(Debug, Clone)]
pub(crate) struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Hash + Eq + Clone> OrderedCounter<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Entries by count descending, ties in first-seen order.
    pub(crate) fn into_sorted_desc(self) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedCounter;

    #[test]
    fn ties_keep_first_seen_order() {
        let mut c = OrderedCounter::new();
        for k in ["b", "a", "c", "a", "b", "d"] {
            c.add(k);
        }
        assert_eq!(c.into_sorted_desc(), vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }
}
