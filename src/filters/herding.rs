use super::Filter;
use crate::data::dataset::{DataValue, Dataset};
use crate::error::{FilterTreeError, Result};
use crate::kernels::Kernel;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Kernel herding: greedy selection of a representative subset.
///
/// Each round picks the example that is most similar on average to the whole
/// batch while being least similar to what has already been picked:
///
/// ```text
/// score(i) = (1/n) Σ_j k(x_i, x_j) - (1/(t+1)) Σ_{s in selected} k(x_s, x_i)
/// ```
///
/// where `t` is the number of examples selected so far.
///
/// As a [`Filter`], fitting runs the selection on the node's batch and keeps
/// the chosen indices, while applying passes every batch through unchanged.
#[derive(Clone, Debug)]
pub struct KernelHerding<K: Kernel> {
    kernel: K,
    sample_size_percent: f64,
    representatives: Vec<usize>,
}

impl<K: Kernel> KernelHerding<K> {
    /// Creates a new selector keeping `sample_size_percent` percent of a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage is outside `[0, 100]`.
    pub fn new(kernel: K, sample_size_percent: f64) -> Result<Self> {
        let mut herding = Self {
            kernel,
            sample_size_percent: 100.0,
            representatives: Vec::new(),
        };
        herding.set_sample_size_percent(sample_size_percent)?;
        Ok(herding)
    }

    pub fn set_sample_size_percent(&mut self, sample_size_percent: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&sample_size_percent) {
            return Err(FilterTreeError::invalid_parameter(
                "sample_size_percent",
                format!("{} is not between 0 and 100", sample_size_percent),
            ));
        }
        self.sample_size_percent = sample_size_percent;
        Ok(())
    }

    pub fn sample_size_percent(&self) -> f64 {
        self.sample_size_percent
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Indices picked by the last call to [`Filter::fit`], in selection order.
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Number of examples kept out of a batch of `num_samples`.
    pub fn sample_size(&self, num_samples: usize) -> usize {
        let size = (num_samples as f64 * self.sample_size_percent / 100.0).floor() as usize;
        size.min(num_samples)
    }

    /// Returns the indices of the selected rows of `x`, in selection order.
    pub fn select(&self, x: &DMatrix<f64>) -> Vec<usize> {
        let num_samples = x.nrows();
        let sample_size = self.sample_size(num_samples);
        let rows: Vec<DVector<f64>> = x.row_iter().map(|row| row.transpose()).collect();

        let mut mean_similarity: Vec<Option<f64>> = vec![None; num_samples];
        let mut selected_similarity = vec![0.0; num_samples];
        let mut is_selected = vec![false; num_samples];
        let mut selected = Vec::with_capacity(sample_size);

        for round in 0..sample_size {
            if let Some(&last) = selected.last() {
                for index in (0..num_samples).filter(|&index| !is_selected[index]) {
                    selected_similarity[index] += self.kernel.eval(&rows[last], &rows[index]);
                }
            }

            let mut best: Option<(usize, f64)> = None;
            for index in (0..num_samples).filter(|&index| !is_selected[index]) {
                let mean = *mean_similarity[index].get_or_insert_with(|| {
                    rows.iter()
                        .map(|other| self.kernel.eval(&rows[index], other))
                        .sum::<f64>()
                        / num_samples as f64
                });
                let score = mean - selected_similarity[index] / (round + 1) as f64;
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((index, score));
                }
            }

            let Some((index, score)) = best else {
                break;
            };
            debug!(round, index, score, "Selected representative");
            is_selected[index] = true;
            selected.push(index);
        }
        selected
    }

    /// Returns the selected examples, in selection order.
    pub fn sample<YT: DataValue>(&self, dataset: &Dataset<f64, YT>) -> Result<Dataset<f64, YT>> {
        dataset.check_shape()?;
        Ok(dataset.select_rows(&self.select(&dataset.x)))
    }
}

impl<K: Kernel> Filter for KernelHerding<K> {
    fn fit(&mut self, dataset: &Dataset<f64, usize>) -> Result<()> {
        self.representatives = self.select(&dataset.x);
        Ok(())
    }

    fn apply(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        Ok(x.clone())
    }
}
