//! Rounded integer aggregates over view counts

/// Median of `values`, 0 when empty.
///
/// Even-length inputs return the mean of the two middle elements, rounded half up.
/// The caller's slice is left untouched.
pub fn median(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 != 0 {
        sorted[mid]
    } else {
        round_half_up(sorted[mid - 1] as f64 / 2.0 + sorted[mid] as f64 / 2.0)
    }
}

/// Rounded arithmetic mean of `values`, 0 when empty
pub fn average(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    round_half_up(total(values) as f64 / values.len() as f64)
}

/// Saturating sum of `values`
pub fn total(values: &[u64]) -> u64 {
    values.iter().fold(0u64, |acc, v| acc.saturating_add(*v))
}

/// Round to the nearest integer, halves toward positive infinity
pub(crate) fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor().max(0.0) as u64
}

/// Signed variant of [`round_half_up`] used for lift percentages
pub(crate) fn round_half_up_signed(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round to one decimal place, halves up
pub(crate) fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Round to two decimal places, halves up
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[10, 20, 30]), 20);
        assert_eq!(median(&[10, 20, 30, 40]), 25);
        assert_eq!(median(&[]), 0);
        assert_eq!(median(&[7]), 7);
    }

    #[test]
    fn test_median_unsorted_input_is_not_mutated() {
        let values = vec![40, 10, 30, 20];
        assert_eq!(median(&values), 25);
        assert_eq!(values, vec![40, 10, 30, 20]);
    }

    #[test]
    fn test_median_even_rounds_half_up() {
        assert_eq!(median(&[1, 2]), 2);
        assert_eq!(median(&[3, 4, 1, 2]), 3);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0);
        assert_eq!(average(&[1, 2]), 2);
        assert_eq!(average(&[100, 200, 300, 400, 10000]), 2200);
        assert_eq!(average(&[1, 1, 2]), 1);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round_half_up_signed(-0.5), 0);
        assert_eq!(round_half_up_signed(-1.6), -2);
        assert_eq!(round_to_tenths(2.25), 2.3);
        assert_eq!(round_to_hundredths(3.14159), 3.14);
    }
}
