//! Entropy-based threshold search.
//!
//! Splits are chosen by *minimizing* the weighted entropy of the two sides,
//! which is equivalent to maximizing information gain for a fixed parent.
use nalgebra::DMatrix;

/// Best split found over a filtered batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub feature_index: usize,
    pub threshold: f64,
    pub weighted_entropy: f64,
}

/// Shannon entropy (base 2) of a class-count vector, with `0 * log2(0) = 0`.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Size-weighted average entropy of the two sides of a binary split.
pub fn weighted_entropy(left: &[usize], right: &[usize]) -> f64 {
    let left_total: usize = left.iter().sum();
    let right_total: usize = right.iter().sum();
    let total = (left_total + right_total) as f64;
    if total == 0.0 {
        return 0.0;
    }
    (left_total as f64 / total) * entropy(left) + (right_total as f64 / total) * entropy(right)
}

/// Finds the threshold on one feature column with the lowest weighted entropy.
///
/// Returns `(threshold, weighted_entropy)`, or `None` when the column admits no
/// split (fewer than two rows, or a constant column).
pub fn best_split_for_feature(
    values: &[f64],
    labels: &[usize],
    num_classes: usize,
) -> Option<(f64, f64)> {
    let num_samples = values.len().min(labels.len());
    if num_samples < 2 {
        return None;
    }

    let mut order: Vec<usize> = (0..num_samples).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut left_counts = vec![0usize; num_classes];
    let mut right_counts = vec![0usize; num_classes];
    for &index in &order {
        right_counts[labels[index]] += 1;
    }

    let mut best: Option<(f64, f64)> = None;
    for window in order.windows(2) {
        let (current, next) = (window[0], window[1]);
        let label = labels[current];
        left_counts[label] += 1;
        right_counts[label] -= 1;

        let (low, high) = (values[current], values[next]);
        if low == high {
            continue;
        }

        let candidate_entropy = weighted_entropy(&left_counts, &right_counts);
        let threshold = (low + high) / 2.0;
        // The midpoint can collapse onto a bound (or overflow) for adjacent floats.
        let is_interior = low < threshold && threshold < high;
        let is_better = best.map_or(true, |(_, best_entropy)| candidate_entropy < best_entropy);
        if is_better && is_interior {
            best = Some((threshold, candidate_entropy));
        }
    }
    best
}

/// Picks the feature whose best threshold has the lowest weighted entropy.
///
/// Earlier features win ties. Returns `None` when no feature can be split.
pub fn best_split(x: &DMatrix<f64>, labels: &[usize], num_classes: usize) -> Option<Split> {
    let mut best: Option<Split> = None;
    for (feature_index, column) in x.column_iter().enumerate() {
        let values: Vec<f64> = column.iter().copied().collect();
        let Some((threshold, weighted_entropy)) =
            best_split_for_feature(&values, labels, num_classes)
        else {
            continue;
        };

        if best.map_or(true, |split| weighted_entropy < split.weighted_entropy) {
            best = Some(Split {
                feature_index,
                threshold,
                weighted_entropy,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_entropy_of_pure_counts_is_zero() {
        assert_eq!(entropy(&[6, 0]), 0.0);
        assert_eq!(entropy(&[0, 0, 9]), 0.0);
    }

    #[test]
    fn test_entropy_of_even_split_is_one() {
        assert_relative_eq!(entropy(&[4, 4]), 1.0);
        assert_relative_eq!(entropy(&[1, 1, 1, 1]), 2.0);
    }

    #[test]
    fn test_entropy_of_empty_counts() {
        assert_eq!(entropy(&[0, 0]), 0.0);
        assert_eq!(entropy(&[]), 0.0);
    }

    #[test]
    fn test_weighted_entropy() {
        // Left is pure, right is an even mix of 2 out of 4 total.
        assert_relative_eq!(weighted_entropy(&[2, 0], &[1, 1]), 0.5);
        assert_eq!(weighted_entropy(&[2, 0], &[0, 2]), 0.0);
    }

    #[test]
    fn test_best_split_for_feature_separates_classes() {
        let values = [2.0, 1.0, 2.0, 1.0];
        let labels = [1, 0, 1, 0];
        let (threshold, entropy) = best_split_for_feature(&values, &labels, 2).unwrap();
        assert_eq!(threshold, 1.5);
        assert_eq!(entropy, 0.0);
    }

    #[test]
    fn test_best_split_for_feature_first_candidate_wins_ties() {
        // Every boundary leaves one impure side of equal entropy.
        let values = [1.0, 2.0, 3.0];
        let labels = [0, 1, 0];
        let (threshold, _) = best_split_for_feature(&values, &labels, 2).unwrap();
        assert_eq!(threshold, 1.5);
    }

    #[test]
    fn test_best_split_for_feature_constant_column() {
        assert!(best_split_for_feature(&[3.0, 3.0, 3.0], &[0, 1, 0], 2).is_none());
    }

    #[test]
    fn test_best_split_for_feature_single_row() {
        assert!(best_split_for_feature(&[1.0], &[0], 2).is_none());
    }

    #[test]
    fn test_best_split_for_feature_rejects_degenerate_midpoint() {
        let low = 1.0_f64;
        let high = f64::from_bits(low.to_bits() + 1);
        assert!(best_split_for_feature(&[low, high], &[0, 1], 2).is_none());
    }

    #[test]
    fn test_best_split_prefers_lower_entropy_feature() {
        // Feature 0 is noisy, feature 1 separates the classes perfectly.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 10.0, 2.0, 10.0, 1.0, 20.0, 2.0, 20.0]);
        let labels = [0, 0, 1, 1];
        let split = best_split(&x, &labels, 2).unwrap();
        assert_eq!(split.feature_index, 1);
        assert_eq!(split.threshold, 15.0);
        assert_eq!(split.weighted_entropy, 0.0);
    }

    #[test]
    fn test_best_split_earlier_feature_wins_ties() {
        let x = DMatrix::from_row_slice(2, 2, &[0.0, 5.0, 1.0, 6.0]);
        let split = best_split(&x, &[0, 1], 2).unwrap();
        assert_eq!(split.feature_index, 0);
        assert_eq!(split.threshold, 0.5);
    }

    #[test]
    fn test_best_split_none_when_all_constant() {
        let x = DMatrix::from_element(3, 2, 4.0);
        assert!(best_split(&x, &[0, 1, 1], 2).is_none());
    }
}
