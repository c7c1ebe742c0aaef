//! Per-node data filters.
//!
//! A filter is fitted on the examples that reach a tree node and then maps
//! feature matrices into that node's derived feature space. Applying a fitted
//! filter must be deterministic and must return one output row per input row,
//! in the same order.
use crate::data::dataset::Dataset;
use crate::error::Result;
use nalgebra::DMatrix;

/// Herding-based representative selection
pub mod herding;
/// Pass-through filter
pub mod identity;
/// Sparse random projections
pub mod projection;
/// Column standardization
pub mod standardize;

pub use herding::KernelHerding;
pub use identity::IdentityFilter;
pub use projection::RandomProjection;
pub use standardize::Standardize;

pub trait Filter: Clone + Send + Sync {
    /// Fits the filter's internal state on a batch of training examples.
    fn fit(&mut self, dataset: &Dataset<f64, usize>) -> Result<()>;

    /// Maps a feature matrix into the filter's output space.
    fn apply(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Reseeds a randomized filter. Deterministic filters ignore this.
    fn set_seed(&mut self, _seed: u64) {}

    /// Whether the filter consumes a seed when it is cloned onto a node.
    fn is_randomized(&self) -> bool {
        false
    }
}
