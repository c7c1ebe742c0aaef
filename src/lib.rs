//! # Filter-tree
//!
//! `filter-tree` implements binary decision trees in which every internal node
//! fits its own copy of a data filter on the examples that reach it, and then
//! picks an entropy-minimizing threshold in the filtered feature space. The
//! fitted filters stay in the tree and are re-applied when classifying.
//!
//! It also provides kernel herding, a greedy selector of representative
//! examples that can be used on its own or as a node filter.
//!
//! ## Example Usage
//!
//! As a quick example, here's how to train a filter tree that standardizes the
//! features at every node:
//!
//! ```rust
//! use filter_tree::data::dataset::Dataset;
//! use filter_tree::filters::Standardize;
//! use filter_tree::trees::classifier::FilterTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
//! let y = DVector::from_vec(vec![0u8, 0, 1, 1]);
//!
//! let dataset = Dataset::new(x, y);
//!
//! let mut model = FilterTreeClassifier::new(Standardize::new());
//!
//! model.fit(&dataset).unwrap();
//!
//! let test_x = DMatrix::from_row_slice(2, 2, &[1.5, 2.5, 7.5, 8.5]);
//!
//! let predictions = model.predict(&test_x).unwrap();
//! assert_eq!(predictions, DVector::from_vec(vec![0, 1]));
//! ```

/// Dataset and data manipulation utilities
pub mod data;
/// Error type shared by the whole crate
pub mod error;
/// Filters fitted at tree nodes
pub mod filters;
/// Similarity kernels
pub mod kernels;
/// Functions for evaluating model performance
pub mod metrics;
/// Filter trees
pub mod trees;
