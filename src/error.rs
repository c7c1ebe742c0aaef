use thiserror::Error;

/// Errors raised while building or querying a filter tree.
#[derive(Debug, Error)]
pub enum FilterTreeError {
    /// A parameter was set to a value outside its valid range.
    #[error("Invalid value for {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// The training dataset contains zero samples.
    #[error("The dataset contains no samples.")]
    EmptyDataset,
    /// The feature matrix and the label vector disagree on the number of samples.
    #[error("The feature matrix has {rows} rows but {labels} labels were given.")]
    ShapeMismatch { rows: usize, labels: usize },
    /// A label could not be mapped into `0..num_classes`.
    #[error("Label {label} is outside of the class range 0..{num_classes}.")]
    InvalidLabel { label: String, num_classes: usize },
    /// A filter failed to fit or to apply.
    #[error("Filter failed: {0}")]
    Filter(String),
    /// A filter returned a different number of rows than it was given.
    #[error("Filter returned {got} rows for {expected} input rows.")]
    FilterRowCount { expected: usize, got: usize },
    /// A filtered example is too narrow for the split stored at a node.
    #[error("Split feature {feature_index} is missing from a filtered example with {num_features} features.")]
    MissingFeature {
        feature_index: usize,
        num_features: usize,
    },
    /// The model was queried before `fit` succeeded.
    #[error("Tree wasn't built yet.")]
    NotFitted,
    /// Two sequences that should be paired have different lengths.
    #[error("Expected {expected} values, got {got}.")]
    LengthMismatch { expected: usize, got: usize },
}

impl FilterTreeError {
    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterTreeError>;
