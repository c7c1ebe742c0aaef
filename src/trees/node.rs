use crate::error::{FilterTreeError, Result};
use crate::filters::Filter;
use nalgebra::DMatrix;

/// Filter tree node
#[derive(Clone, Debug)]
pub enum FilterTreeNode<F: Filter> {
    /// Internal node. Examples whose filtered value at `feature_index` is
    /// `<= threshold` go left, the others go right.
    Split {
        /// The filter fitted on the examples that reached this node.
        filter: F,
        feature_index: usize,
        threshold: f64,
        weighted_entropy: f64,
        num_samples: usize,
        left: Box<FilterTreeNode<F>>,
        right: Box<FilterTreeNode<F>>,
    },
    Leaf {
        class_counts: Vec<usize>,
        probabilities: Vec<f64>,
    },
}

impl<F: Filter> FilterTreeNode<F> {
    /// Creates a leaf from class counts. A leaf without examples gets all-zero probabilities.
    pub fn leaf(class_counts: Vec<usize>) -> Self {
        let total: usize = class_counts.iter().sum();
        let probabilities = class_counts
            .iter()
            .map(|&count| {
                if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                }
            })
            .collect();
        Self::Leaf {
            class_counts,
            probabilities,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of training examples that reached this node.
    pub fn num_samples(&self) -> usize {
        match self {
            Self::Split { num_samples, .. } => *num_samples,
            Self::Leaf { class_counts, .. } => class_counts.iter().sum(),
        }
    }

    /// Length of the longest path to a leaf. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
            Self::Leaf { .. } => 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            Self::Split { left, right, .. } => 1 + left.num_nodes() + right.num_nodes(),
            Self::Leaf { .. } => 1,
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self {
            Self::Split { left, right, .. } => left.num_leaves() + right.num_leaves(),
            Self::Leaf { .. } => 1,
        }
    }

    /// Routes a single example (a 1-row matrix in the original feature space)
    /// down to a leaf and returns the leaf's class probabilities.
    ///
    /// Every split node re-applies its own fitted filter to the example.
    pub fn classify(&self, example: &DMatrix<f64>) -> Result<&[f64]> {
        match self {
            Self::Leaf { probabilities, .. } => Ok(probabilities.as_slice()),
            Self::Split {
                filter,
                feature_index,
                threshold,
                left,
                right,
                ..
            } => {
                let filtered = filter.apply(example)?;
                if filtered.nrows() != example.nrows() {
                    return Err(FilterTreeError::FilterRowCount {
                        expected: example.nrows(),
                        got: filtered.nrows(),
                    });
                }
                let value = filtered.get((0, *feature_index)).ok_or(
                    FilterTreeError::MissingFeature {
                        feature_index: *feature_index,
                        num_features: filtered.ncols(),
                    },
                )?;

                if *value <= *threshold {
                    left.classify(example)
                } else {
                    right.classify(example)
                }
            }
        }
    }
}
