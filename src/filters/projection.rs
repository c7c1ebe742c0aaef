use super::Filter;
use crate::data::dataset::Dataset;
use crate::error::{FilterTreeError, Result};
use nalgebra::DMatrix;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Projects the features onto `num_components` random directions.
///
/// The projection matrix is sparse (Achlioptas): every entry is `+sqrt(3/k)`
/// with probability 1/6, `-sqrt(3/k)` with probability 1/6 and `0` otherwise.
/// It is drawn at fit time from the filter's seed, so a tree node that reseeds
/// its copy gets its own projection.
#[derive(Clone, Debug)]
pub struct RandomProjection {
    num_components: usize,
    seed: u64,
    projection: Option<DMatrix<f64>>,
}

impl RandomProjection {
    /// # Errors
    ///
    /// Returns an error if `num_components` is zero.
    pub fn new(num_components: usize) -> Result<Self> {
        if num_components == 0 {
            return Err(FilterTreeError::invalid_parameter(
                "num_components",
                "must be greater than 0",
            ));
        }
        Ok(Self {
            num_components,
            seed: 1,
            projection: None,
        })
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn projection(&self) -> Option<&DMatrix<f64>> {
        self.projection.as_ref()
    }
}

impl Filter for RandomProjection {
    fn fit(&mut self, dataset: &Dataset<f64, usize>) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let scale = (3.0 / self.num_components as f64).sqrt();

        self.projection = Some(DMatrix::from_fn(
            dataset.ncols(),
            self.num_components,
            |_, _| match rng.gen_range(0..6) {
                0 => scale,
                1 => -scale,
                _ => 0.0,
            },
        ));
        Ok(())
    }

    fn apply(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let projection = self.projection.as_ref().ok_or_else(|| {
            FilterTreeError::Filter("random projection was applied before it was fitted".into())
        })?;
        if x.ncols() != projection.nrows() {
            return Err(FilterTreeError::Filter(format!(
                "random projection was fitted on {} columns but got {}",
                projection.nrows(),
                x.ncols()
            )));
        }
        Ok(x * projection)
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn is_randomized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn batch() -> Dataset<f64, usize> {
        let x = DMatrix::from_row_slice(3, 4, &[1.0; 12]);
        Dataset::new(x, DVector::from_vec(vec![0, 1, 0]))
    }

    #[test]
    fn test_projection_shape() {
        let mut filter = RandomProjection::new(2).unwrap();
        filter.fit(&batch()).unwrap();
        assert_eq!(filter.projection().unwrap().shape(), (4, 2));
        assert_eq!(filter.apply(&batch().x).unwrap().shape(), (3, 2));
    }

    #[test]
    fn test_projection_is_reproducible_per_seed() {
        let mut first = RandomProjection::new(8).unwrap();
        let mut second = RandomProjection::new(8).unwrap();
        first.set_seed(42);
        second.set_seed(42);
        first.fit(&batch()).unwrap();
        second.fit(&batch()).unwrap();
        assert_eq!(first.projection(), second.projection());

        let mut other = RandomProjection::new(8).unwrap();
        other.set_seed(43);
        other.fit(&batch()).unwrap();
        assert_ne!(first.projection(), other.projection());
    }

    #[test]
    fn test_projection_entries_are_sparse_signs() {
        let mut filter = RandomProjection::new(3).unwrap();
        filter.fit(&batch()).unwrap();
        assert!(filter
            .projection()
            .unwrap()
            .iter()
            .all(|&v| v == 0.0 || v == 1.0 || v == -1.0));
    }

    #[test]
    fn test_projection_errors() {
        assert!(RandomProjection::new(0).is_err());

        let filter = RandomProjection::new(2).unwrap();
        assert!(filter.apply(&batch().x).is_err());

        let mut fitted = RandomProjection::new(2).unwrap();
        fitted.fit(&batch()).unwrap();
        assert!(fitted.apply(&DMatrix::zeros(1, 3)).is_err());
    }
}
