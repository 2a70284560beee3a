//! Leading-digit (first significant digit) distribution.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::types::Value;

/// The nine leading-digit buckets, in order.
pub const DIGITS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// First character in `'1'..='9'` of the absolute value's string form.
///
/// Signs, zeros and other non-digit characters are skipped. Returns `None` when there is no
/// such character (e.g. `0` or `"n/a"`).
pub fn leading_digit(value: &Value) -> Option<char> {
    value.abs_string().chars().find(|c| ('1'..='9').contains(c))
}

/// Leading digit of `value`, but only if it is a member of `restriction`.
///
/// A digit absent from the set (or a value without one) is "no match", not an error.
pub fn leading_digit_in(value: &Value, restriction: &HashSet<String>) -> Option<char> {
    if restriction.is_empty() {
        return None;
    }
    let d = leading_digit(value)?;
    let mut buf = [0u8; 4];
    restriction.contains(&*d.encode_utf8(&mut buf)).then_some(d)
}

/// Expected Benford frequency of `digit`: `log10(1 + 1/d)`. Zero for anything outside `1..=9`.
pub fn benford_expected(digit: char) -> f64 {
    match digit.to_digit(10) {
        Some(d) if d >= 1 => (1.0 + 1.0 / f64::from(d)).log10(),
        _ => 0.0,
    }
}

fn bucket(digit: char) -> Option<usize> {
    match digit.to_digit(10) {
        Some(d) if d >= 1 => Some(d as usize - 1),
        _ => None,
    }
}

/// Leading-digit counts plus the number of values considered.
///
/// Frequencies divide each bucket by *all* values considered, including those without a
/// leading digit, so they may sum to less than 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadingDigits {
    counts: [usize; 9],
    considered: usize,
}

impl LeadingDigits {
    /// Accumulate the distribution of `values`.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut out = Self::default();
        for v in values {
            out.considered += 1;
            if let Some(i) = leading_digit(v).and_then(bucket) {
                out.counts[i] += 1;
            }
        }
        out
    }

    /// Number of values scanned, with or without a leading digit.
    pub fn considered(&self) -> usize {
        self.considered
    }

    /// Number of values that had a leading digit.
    pub fn with_digit(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Values whose leading digit is `digit`; zero for anything outside `'1'..='9'`.
    pub fn count(&self, digit: char) -> usize {
        bucket(digit).map(|i| self.counts[i]).unwrap_or(0)
    }

    /// Frequency of `digit`; zero when nothing was considered.
    pub fn frequency(&self, digit: char) -> f64 {
        if self.considered == 0 {
            return 0.0;
        }
        self.count(digit) as f64 / self.considered as f64
    }

    /// Counts keyed by digit, all nine buckets present.
    pub fn counts(&self) -> BTreeMap<char, usize> {
        DIGITS.iter().map(|&d| (d, self.count(d))).collect()
    }

    /// Frequencies keyed by digit, all nine buckets present.
    pub fn frequencies(&self) -> BTreeMap<char, f64> {
        DIGITS.iter().map(|&d| (d, self.frequency(d))).collect()
    }

    /// Benford reference curve for overlay charts.
    pub fn expected() -> BTreeMap<char, f64> {
        DIGITS.iter().map(|&d| (d, benford_expected(d))).collect()
    }

    /// Mean absolute deviation between observed and Benford frequencies.
    pub fn mean_absolute_deviation(&self) -> f64 {
        DIGITS
            .iter()
            .map(|&d| (self.frequency(d) - benford_expected(d)).abs())
            .sum::<f64>()
            / DIGITS.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{benford_expected, leading_digit, leading_digit_in, LeadingDigits, DIGITS};
    use crate::types::Value;

    #[test]
    fn count_outside_digit_range_is_zero() {
        let values = vec![Value::Number(10.0), Value::Number(0.0)];
        let digits = LeadingDigits::from_values(&values);
        assert_eq!(digits.count('1'), 1);
        assert_eq!(digits.count('0'), 0);
        assert_eq!(digits.count('x'), 0);
    }

    #[test]
    fn skips_sign_and_zeros() {
        assert_eq!(leading_digit(&Value::Number(-304.0)), Some('3'));
        assert_eq!(leading_digit(&Value::Number(0.0042)), Some('4'));
        assert_eq!(leading_digit(&Value::from("$0.90")), Some('9'));
        assert_eq!(leading_digit(&Value::Number(0.0)), None);
        assert_eq!(leading_digit(&Value::from("n/a")), None);
    }

    #[test]
    fn restriction_lookup_returns_none_when_absent() {
        let set: HashSet<String> = ["1".to_string(), "3".to_string()].into_iter().collect();
        assert_eq!(leading_digit_in(&Value::Number(312.0), &set), Some('3'));
        assert_eq!(leading_digit_in(&Value::Number(212.0), &set), None);
        assert_eq!(leading_digit_in(&Value::Number(0.0), &set), None);
        assert_eq!(leading_digit_in(&Value::Number(1.0), &HashSet::new()), None);
    }

    #[test]
    fn normalizes_by_all_values_considered() {
        let values: Vec<Value> = [1.0, 12.0, 0.0, 2.0].into_iter().map(Value::from).collect();
        let dist = LeadingDigits::from_values(&values);
        assert_eq!(dist.considered(), 4);
        assert_eq!(dist.with_digit(), 3);
        assert_eq!(dist.count('1'), 2);
        assert_eq!(dist.frequency('1'), 0.5);
        assert_eq!(dist.frequency('2'), 0.25);

        // The zero has no leading digit, so frequencies under-sum.
        let total: f64 = dist.frequencies().values().sum();
        assert!((total - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_input_is_zero_filled() {
        let dist = LeadingDigits::from_values(&Vec::<Value>::new());
        assert_eq!(dist.considered(), 0);
        let freqs = dist.frequencies();
        assert_eq!(freqs.len(), 9);
        assert!(freqs.values().all(|f| *f == 0.0));
        assert!(dist.counts().values().all(|c| *c == 0));
    }

    #[test]
    fn benford_curve_sums_to_one() {
        let total: f64 = DIGITS.iter().map(|&d| benford_expected(d)).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((benford_expected('1') - 0.30103).abs() < 1e-5);
        assert_eq!(benford_expected('0'), 0.0);
    }

    #[test]
    fn perfect_benford_sample_has_small_deviation() {
        let mut values = Vec::new();
        for (d, n) in [(1, 301), (2, 176), (3, 125), (4, 97), (5, 79), (6, 67), (7, 58), (8, 51), (9, 46)] {
            values.extend(std::iter::repeat_n(Value::from(d * 100 + 7), n));
        }
        let dist = LeadingDigits::from_values(&values);
        assert!(dist.mean_absolute_deviation() < 0.001);
    }
}
