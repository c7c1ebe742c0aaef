//! Filter Tree Classifier
use super::{node::FilterTreeNode, params::FilterTreeParams, split::best_split};
use crate::{
    data::dataset::{Dataset, WholeNumber},
    error::{FilterTreeError, Result},
    filters::Filter,
    metrics::confusion::ClassificationMetrics,
};
use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Binary decision tree that fits its own copy of a filter at every node.
///
/// Each node fits a clone of the configured filter on the examples that reach
/// it, looks for the threshold with the lowest weighted entropy in the
/// filtered space, and routes the original examples to its children. The
/// fitted filters are kept in the tree and re-applied at prediction time.
#[derive(Clone, Debug)]
pub struct FilterTreeClassifier<F: Filter, YT: WholeNumber> {
    root: Option<Box<FilterTreeNode<F>>>,
    filter: F,
    tree_params: FilterTreeParams,
    num_classes: usize,

    _marker: PhantomData<YT>,
}

impl<F: Filter, YT: WholeNumber> ClassificationMetrics<YT> for FilterTreeClassifier<F, YT> {}

impl<F: Filter, YT: WholeNumber> FilterTreeClassifier<F, YT> {
    /// Creates a new filter tree with default parameters around the given filter.
    pub fn new(filter: F) -> Self {
        Self {
            root: None,
            filter,
            tree_params: FilterTreeParams::new(),
            num_classes: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a new filter tree with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter cloned onto every node.
    /// * `min_leaf_size` - Nodes with at most this many examples become leaves. Defaults to 1.
    /// * `seed` - Seed used to reseed randomized filters.
    ///
    /// # Errors
    ///
    /// This method will return an error if `min_leaf_size` is 0.
    pub fn with_params(filter: F, min_leaf_size: Option<usize>, seed: Option<u64>) -> Result<Self> {
        let mut tree = Self::new(filter);
        tree.set_min_leaf_size(min_leaf_size.unwrap_or(1))?;
        tree.set_seed(seed);
        Ok(tree)
    }

    pub fn set_min_leaf_size(&mut self, min_leaf_size: usize) -> Result<()> {
        self.tree_params.set_min_leaf_size(min_leaf_size)
    }

    pub fn set_num_classes(&mut self, num_classes: Option<usize>) -> Result<()> {
        self.tree_params.set_num_classes(num_classes)
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.tree_params.set_seed(seed)
    }

    pub fn min_leaf_size(&self) -> usize {
        self.tree_params.min_leaf_size()
    }

    pub fn seed(&self) -> Option<u64> {
        self.tree_params.seed()
    }

    pub fn params(&self) -> &FilterTreeParams {
        &self.tree_params
    }

    /// The unfitted filter every node starts from.
    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Number of classes seen by the last successful `fit`.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn root(&self) -> Option<&FilterTreeNode<F>> {
        self.root.as_deref()
    }

    /// Builds the tree from a dataset.
    ///
    /// # Errors
    ///
    /// This method will return an error if the parameters are invalid, the
    /// dataset is empty or malformed, a label is outside the class range, or
    /// any node's filter fails. A failed build leaves the previous tree in place.
    pub fn fit(&mut self, dataset: &Dataset<f64, YT>) -> Result<String> {
        self.tree_params.validate()?;
        dataset.check_shape()?;
        if dataset.nrows() == 0 {
            return Err(FilterTreeError::EmptyDataset);
        }

        let (labels, num_classes) = self.class_indices(&dataset.y)?;
        let training = Dataset::new(dataset.x.clone(), DVector::from_vec(labels));

        let mut rng = match self.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let root = self.build_tree(&training, num_classes, None, 0, &mut rng)?;

        info!(
            num_samples = training.nrows(),
            num_nodes = root.num_nodes(),
            num_leaves = root.num_leaves(),
            depth = root.depth(),
            "Finished building the filter tree"
        );
        self.root = Some(Box::new(root));
        self.num_classes = num_classes;
        Ok("Finished building the tree.".into())
    }

    /// Class probabilities for one example given in the original feature space.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or a
    /// node's filter fails on the example.
    pub fn classify(&self, features: &DVector<f64>) -> Result<Vec<f64>> {
        let root = self.root.as_ref().ok_or(FilterTreeError::NotFitted)?;
        let example = DMatrix::from_row_slice(1, features.len(), features.as_slice());
        Ok(root.classify(&example)?.to_vec())
    }

    /// Class probabilities for every row of `features`, one row per example.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or any
    /// node's filter fails on any example.
    pub fn predict_proba(&self, features: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let root = self.root.as_ref().ok_or(FilterTreeError::NotFitted)?;
        let distributions = (0..features.nrows())
            .into_par_iter()
            .map(|row| {
                let example = features.rows(row, 1).into_owned();
                root.classify(&example).map(<[f64]>::to_vec)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DMatrix::from_fn(
            features.nrows(),
            self.num_classes,
            |row, class| distributions[row][class],
        ))
    }

    /// Most probable class for every row of `features`. Ties go to the lowest class.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or any
    /// node's filter fails on any example.
    pub fn predict(&self, features: &DMatrix<f64>) -> Result<DVector<YT>> {
        let probabilities = self.predict_proba(features)?;
        let predictions = probabilities
            .row_iter()
            .map(|row| {
                let mut best_class = 0;
                for (class, &probability) in row.iter().enumerate() {
                    if probability > row[best_class] {
                        best_class = class;
                    }
                }
                YT::from_usize(best_class).ok_or_else(|| FilterTreeError::InvalidLabel {
                    label: best_class.to_string(),
                    num_classes: self.num_classes,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DVector::from_vec(predictions))
    }

    fn class_indices(&self, y: &DVector<YT>) -> Result<(Vec<usize>, usize)> {
        let configured = self.tree_params.num_classes();
        let invalid = |label: &YT, num_classes: usize| FilterTreeError::InvalidLabel {
            label: label.to_string(),
            num_classes,
        };

        let labels = y
            .iter()
            .map(|label| {
                label
                    .to_usize()
                    .ok_or_else(|| invalid(label, configured.unwrap_or(0)))
            })
            .collect::<Result<Vec<_>>>()?;
        let num_classes = match configured {
            Some(num_classes) => num_classes,
            None => labels.iter().max().map_or(0, |&max| max + 1),
        };

        if let Some(position) = labels.iter().position(|&label| label >= num_classes) {
            return Err(invalid(&y[position], num_classes));
        }
        Ok((labels, num_classes))
    }

    fn build_tree(
        &self,
        dataset: &Dataset<f64, usize>,
        num_classes: usize,
        parent_info: Option<f64>,
        depth: usize,
        rng: &mut StdRng,
    ) -> Result<FilterTreeNode<F>> {
        let num_samples = dataset.nrows();

        let mut filter = self.filter.clone();
        if filter.is_randomized() {
            filter.set_seed(rng.gen::<u64>());
        }
        filter.fit(dataset)?;
        let filtered = filter.apply(&dataset.x)?;
        if filtered.nrows() != num_samples {
            return Err(FilterTreeError::FilterRowCount {
                expected: num_samples,
                got: filtered.nrows(),
            });
        }

        let split = best_split(&filtered, dataset.y.as_slice(), num_classes).filter(|split| {
            // Exact comparison with the parent's weighted entropy, no tolerance.
            let no_gain = parent_info.is_some_and(|info| info - split.weighted_entropy == 0.0);
            num_samples > self.min_leaf_size() && !no_gain
        });

        let Some(split) = split else {
            let class_counts = dataset.class_counts(num_classes);
            debug!(depth, num_samples, ?class_counts, "Created leaf");
            return Ok(FilterTreeNode::leaf(class_counts));
        };

        debug!(
            depth,
            num_samples,
            feature_index = split.feature_index,
            threshold = split.threshold,
            weighted_entropy = split.weighted_entropy,
            "Created split"
        );
        let (left_child, right_child) =
            dataset.split_by(|row| filtered[(row, split.feature_index)] <= split.threshold);

        let info = Some(split.weighted_entropy);
        let left_node = self.build_tree(&left_child, num_classes, info, depth + 1, rng)?;
        let right_node = self.build_tree(&right_child, num_classes, info, depth + 1, rng)?;
        Ok(FilterTreeNode::Split {
            filter,
            feature_index: split.feature_index,
            threshold: split.threshold,
            weighted_entropy: split.weighted_entropy,
            num_samples,
            left: Box::new(left_node),
            right: Box::new(right_node),
        })
    }
}
