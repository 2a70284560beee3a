//! Replicate-count histogram.

use std::collections::BTreeMap;

use crate::types::Value;

/// Regroup duplicate counts by magnitude.
///
/// Returns `(magnitude, number of values occurring exactly that many times)` for magnitudes
/// of 2 and above, ascending. Values seen once are not replicates and never appear.
pub fn replicate_histogram(counts: &[(Value, usize)]) -> Vec<(usize, usize)> {
    let mut by_magnitude: BTreeMap<usize, usize> = BTreeMap::new();
    for &(_, count) in counts {
        if count >= 2 {
            *by_magnitude.entry(count).or_insert(0) += 1;
        }
    }
    by_magnitude.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::replicate_histogram;
    use crate::statistics::duplicate_counts;
    use crate::types::Value;

    #[test]
    fn groups_by_magnitude_ascending() {
        let values: Vec<Value> = [1_i64, 1, 2, 2, 2, 3].into_iter().map(Value::from).collect();
        assert_eq!(replicate_histogram(&duplicate_counts(&values)), vec![(2, 1), (3, 1)]);
    }

    #[test]
    fn several_values_share_a_magnitude() {
        let values: Vec<Value> = [4_i64, 9, 4, 8, 9, 8, 8, 8, 1].into_iter().map(Value::from).collect();
        assert_eq!(replicate_histogram(&duplicate_counts(&values)), vec![(2, 2), (4, 1)]);
    }

    #[test]
    fn singletons_never_appear() {
        let values: Vec<Value> = [1_i64, 2, 3].into_iter().map(Value::from).collect();
        assert!(replicate_histogram(&duplicate_counts(&values)).is_empty());
    }
}
