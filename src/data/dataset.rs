use crate::error::{FilterTreeError, Result};
use nalgebra::{DMatrix, DVector};
use num_traits::{FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::PartialOrd;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

pub trait DataValue:
    Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

impl<T> DataValue for T where
    T: Debug + Clone + Copy + Num + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

/// Class labels: integral, hashable values such as `u8` or `usize`.
pub trait WholeNumber: Number + Eq + Hash {}
impl<T> WholeNumber for T where T: Number + Eq + Hash {}

/// A batch of examples: one row of `x` and one entry of `y` per example.
#[derive(Clone)]
pub struct Dataset<XT: Number, YT: DataValue> {
    pub x: DMatrix<XT>,
    pub y: DVector<YT>,
}

impl<XT: Number, YT: DataValue> Debug for Dataset<XT, YT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset ({} x {}) {{", self.x.nrows(), self.x.ncols())?;
        for (row, label) in self.x.row_iter().zip(self.y.iter()) {
            write!(f, "    [")?;
            for value in row.iter() {
                write!(f, "{:?}, ", value)?;
            }
            writeln!(f, "] -> {:?}", label)?;
        }
        write!(f, "}}")
    }
}

impl<XT: Number, YT: DataValue> Dataset<XT, YT> {
    pub fn new(x: DMatrix<XT>, y: DVector<YT>) -> Self {
        Self { x, y }
    }

    pub fn into_parts(&self) -> (&DMatrix<XT>, &DVector<YT>) {
        (&self.x, &self.y)
    }

    pub fn is_not_empty(&self) -> bool {
        !(self.x.is_empty() || self.y.is_empty())
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// Fails when the feature matrix and label vector disagree on the number of samples.
    pub fn check_shape(&self) -> Result<()> {
        if self.x.nrows() != self.y.len() {
            return Err(FilterTreeError::ShapeMismatch {
                rows: self.x.nrows(),
                labels: self.y.len(),
            });
        }
        Ok(())
    }

    /// Copies the given rows, in the given order, into a new dataset.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self::new(self.x.select_rows(indices), self.y.select_rows(indices))
    }

    /// Partitions the rows by a routing predicate evaluated on the row index.
    ///
    /// Rows keep their relative order on both sides, so the predicate can be
    /// computed from a different view of the same examples (for instance a
    /// filtered copy of `x`).
    pub fn split_by<P>(&self, goes_left: P) -> (Self, Self)
    where
        P: Fn(usize) -> bool,
    {
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            (0..self.nrows()).partition(|&index| goes_left(index));

        (
            self.select_rows(&left_indices),
            self.select_rows(&right_indices),
        )
    }

    pub fn split_on_threshold(&self, feature_index: usize, threshold: XT) -> (Self, Self) {
        self.split_by(|index| self.x[(index, feature_index)] <= threshold)
    }

    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(FilterTreeError::invalid_parameter(
                "train_size",
                "should be between 0.0 and 1.0",
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        Ok((
            self.select_rows(train_indices),
            self.select_rows(test_indices),
        ))
    }
}

impl<XT: Number> Dataset<XT, usize> {
    /// Number of examples per class index. Labels outside `0..num_classes` are not counted.
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; num_classes];
        for &label in self.y.iter() {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_rows() -> Dataset<i32, usize> {
        let x = DMatrix::from_row_slice(4, 2, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let y = DVector::from_vec(vec![0, 1, 1, 2]);
        Dataset::new(x, y)
    }

    #[test]
    fn test_dataset_into_parts() {
        let dataset = four_rows();
        let (x, y) = dataset.into_parts();
        assert_eq!(x.shape(), (4, 2));
        assert_eq!(y.len(), 4);
    }

    #[test]
    fn test_dataset_formatting() {
        let x = DMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]);
        let y = DVector::from_vec(vec![5, 6]);
        let dataset = Dataset::new(x, y);

        let expected = "\
Dataset (2 x 2) {
    [1, 2, ] -> 5
    [3, 4, ] -> 6
}";
        assert_eq!(format!("{:?}", dataset), expected);
    }

    #[test]
    fn test_dataset_is_not_empty() {
        assert!(four_rows().is_not_empty());

        let empty = Dataset::new(DMatrix::<f64>::zeros(0, 2), DVector::<usize>::zeros(0));
        assert!(!empty.is_not_empty());
    }

    #[test]
    fn test_check_shape() {
        assert!(four_rows().check_shape().is_ok());

        let broken = Dataset::new(DMatrix::<f64>::zeros(3, 1), DVector::<usize>::zeros(2));
        assert!(matches!(
            broken.check_shape(),
            Err(FilterTreeError::ShapeMismatch { rows: 3, labels: 2 })
        ));
    }

    #[test]
    fn test_select_rows_keeps_order() {
        let subset = four_rows().select_rows(&[3, 0]);
        assert_eq!(subset.x, DMatrix::from_row_slice(2, 2, &[7, 8, 1, 2]));
        assert_eq!(subset.y, DVector::from_vec(vec![2, 0]));
    }

    #[test]
    fn test_split_by_external_routing() {
        let dataset = four_rows();
        let routing = [true, false, true, false];

        let (left, right) = dataset.split_by(|index| routing[index]);
        assert_eq!(left.x, DMatrix::from_row_slice(2, 2, &[1, 2, 5, 6]));
        assert_eq!(right.x, DMatrix::from_row_slice(2, 2, &[3, 4, 7, 8]));
        assert_eq!(left.nrows() + right.nrows(), dataset.nrows());
    }

    #[test]
    fn test_split_on_threshold() {
        let (left, right) = four_rows().split_on_threshold(0, 4);
        assert_eq!(left.nrows(), 2);
        assert_eq!(right.nrows(), 2);
    }

    #[test]
    fn test_split_on_threshold_left_empty() {
        let (left, right) = four_rows().split_on_threshold(0, -1);
        assert_eq!(left.nrows(), 0);
        assert_eq!(left.ncols(), 2);
        assert_eq!(right.nrows(), 4);
    }

    #[test]
    fn test_train_test_split() {
        let (train, test) = four_rows().train_test_split(0.75, Some(7)).unwrap();
        assert_eq!(train.nrows(), 3);
        assert_eq!(test.nrows(), 1);
    }

    #[test]
    fn test_train_test_split_rejects_bad_size() {
        assert!(four_rows().train_test_split(1.5, None).is_err());
    }

    #[test]
    fn test_class_counts() {
        assert_eq!(four_rows().class_counts(3), vec![1, 2, 1]);
        assert_eq!(four_rows().class_counts(4), vec![1, 2, 1, 0]);
    }
}
