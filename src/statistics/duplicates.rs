//! Duplicate value counts.

use crate::types::Value;

use super::OrderedCounter;

/// Count occurrences of each value.
///
/// Output is sorted by count descending. Ties keep the order in which values were first seen,
/// so the ranking depends on iteration (display) order.
pub fn duplicate_counts<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<(Value, usize)> {
    let mut counter = OrderedCounter::new();
    for v in values {
        counter.add(v.clone());
    }
    counter.into_sorted_desc()
}
