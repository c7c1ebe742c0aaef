use super::Filter;
use crate::data::dataset::Dataset;
use crate::error::{FilterTreeError, Result};
use nalgebra::{DMatrix, DVector};

/// Rescales every column to zero mean and unit (population) variance, using
/// statistics fitted on the training batch.
#[derive(Clone, Debug, Default)]
pub struct Standardize {
    means: Option<DVector<f64>>,
    std_devs: Option<DVector<f64>>,
}

impl Standardize {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn means(&self) -> Option<&DVector<f64>> {
        self.means.as_ref()
    }

    pub fn std_devs(&self) -> Option<&DVector<f64>> {
        self.std_devs.as_ref()
    }
}

impl Filter for Standardize {
    fn fit(&mut self, dataset: &Dataset<f64, usize>) -> Result<()> {
        let x = &dataset.x;
        if x.nrows() == 0 {
            return Err(FilterTreeError::Filter(
                "cannot standardize an empty batch".into(),
            ));
        }
        let nrows = x.nrows() as f64;

        let means = DVector::from_iterator(x.ncols(), x.column_iter().map(|col| col.sum() / nrows));
        let std_devs = DVector::from_iterator(
            x.ncols(),
            x.column_iter().zip(means.iter()).map(|(col, &mean)| {
                let sum_sq: f64 = col.iter().map(|&val| (val - mean) * (val - mean)).sum();
                (sum_sq / nrows).sqrt()
            }),
        );

        self.means = Some(means);
        self.std_devs = Some(std_devs);
        Ok(())
    }

    fn apply(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let (Some(means), Some(std_devs)) = (&self.means, &self.std_devs) else {
            return Err(FilterTreeError::Filter(
                "standardize was applied before it was fitted".into(),
            ));
        };
        if x.ncols() != means.len() {
            return Err(FilterTreeError::Filter(format!(
                "standardize was fitted on {} columns but got {}",
                means.len(),
                x.ncols()
            )));
        }

        let mut output = x.clone();
        for (j, mut col) in output.column_iter_mut().enumerate() {
            let (mean, std_dev) = (means[j], std_devs[j]);
            // Constant columns are only centred.
            let scale = if std_dev > 0.0 { std_dev } else { 1.0 };
            col.apply(|val| *val = (*val - mean) / scale);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fitted(x: &DMatrix<f64>) -> Standardize {
        let mut filter = Standardize::new();
        filter
            .fit(&Dataset::new(x.clone(), DVector::zeros(x.nrows())))
            .unwrap();
        filter
    }

    #[test]
    fn test_standardize_training_batch() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let output = fitted(&x).apply(&x).unwrap();

        let expected = DMatrix::from_row_slice(
            3,
            2,
            &[
                -1.224744871391589,
                -1.224744871391589,
                0.0,
                0.0,
                1.224744871391589,
                1.224744871391589,
            ],
        );
        assert_relative_eq!(output, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_standardize_uses_fitted_statistics() {
        let train = DMatrix::from_row_slice(2, 1, &[0.0, 2.0]);
        let filter = fitted(&train);

        let single = DMatrix::from_row_slice(1, 1, &[3.0]);
        assert_relative_eq!(filter.apply(&single).unwrap()[(0, 0)], 2.0);
    }

    #[test]
    fn test_standardize_constant_column_is_centred() {
        let x = DMatrix::from_row_slice(2, 1, &[5.0, 5.0]);
        let output = fitted(&x).apply(&x).unwrap();
        assert_eq!(output, DMatrix::zeros(2, 1));
    }

    #[test]
    fn test_standardize_errors() {
        let unfitted = Standardize::new();
        assert!(unfitted.apply(&DMatrix::zeros(1, 1)).is_err());

        let filter = fitted(&DMatrix::from_row_slice(2, 1, &[0.0, 1.0]));
        assert!(matches!(
            filter.apply(&DMatrix::zeros(1, 3)),
            Err(FilterTreeError::Filter(_))
        ));

        let mut empty = Standardize::new();
        assert!(empty
            .fit(&Dataset::new(DMatrix::zeros(0, 2), DVector::zeros(0)))
            .is_err());
    }
}
