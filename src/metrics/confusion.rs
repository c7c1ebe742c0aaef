use crate::data::dataset::WholeNumber;
use crate::error::{FilterTreeError, Result};
use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;

/// Rows are true classes, columns are predicted classes, both in ascending label order.
pub type ConfusionMatrix = DMatrix<usize>;

/// Smallest probability used by [`ClassificationMetrics::log_loss`] before taking the logarithm.
const MIN_PROBABILITY: f64 = 1e-15;

pub trait ClassificationMetrics<T: WholeNumber> {
    /// Counts how often each true label was predicted as each label.
    ///
    /// Only labels that occur in `y_true` or `y_pred` get a row and a column.
    fn confusion_matrix(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<ConfusionMatrix> {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut classes: Vec<T> = y_true.iter().chain(y_pred.iter()).copied().collect();
        classes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        classes.dedup();

        let position = |label: &T| classes.iter().position(|class| class == label);
        let mut matrix = DMatrix::zeros(classes.len(), classes.len());
        for (y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            if let (Some(row), Some(col)) = (position(y_t), position(y_p)) {
                matrix[(row, col)] += 1;
            }
        }
        Ok(matrix)
    }

    /// Share of predictions that match the true label.
    fn accuracy(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }
        Ok(matrix.diagonal().sum() as f64 / y_true.len() as f64)
    }

    /// Precision averaged over classes. Classes never predicted contribute 0.
    fn precision(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(macro_average(&matrix, |class| matrix.column(class).sum()))
    }

    /// Recall averaged over classes. Classes that never occur contribute 0.
    fn recall(&self, y_true: &DVector<T>, y_pred: &DVector<T>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(macro_average(&matrix, |class| matrix.row(class).sum()))
    }

    /// Mean negative log-likelihood of the true labels under predicted class
    /// probabilities (one row per example, one column per class index).
    fn log_loss(&self, y_true: &DVector<T>, probabilities: &DMatrix<f64>) -> Result<f64> {
        check_lengths(y_true.len(), probabilities.nrows())?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let mut total = 0.0;
        for (row, label) in y_true.iter().enumerate() {
            let class = label
                .to_usize()
                .filter(|&class| class < probabilities.ncols())
                .ok_or_else(|| FilterTreeError::InvalidLabel {
                    label: label.to_string(),
                    num_classes: probabilities.ncols(),
                })?;
            total -= probabilities[(row, class)].max(MIN_PROBABILITY).ln();
        }
        Ok(total / y_true.len() as f64)
    }
}

fn check_lengths(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(FilterTreeError::LengthMismatch { expected, got });
    }
    Ok(())
}

fn macro_average<D>(matrix: &ConfusionMatrix, denominator: D) -> f64
where
    D: Fn(usize) -> usize,
{
    let num_classes = matrix.nrows();
    if num_classes == 0 {
        return 0.0;
    }
    let total: f64 = (0..num_classes)
        .map(|class| match denominator(class) {
            0 => 0.0,
            count => matrix[(class, class)] as f64 / count as f64,
        })
        .sum();
    total / num_classes as f64
}
