use crate::error::{FilterTreeError, Result};

#[derive(Clone, Debug)]
pub struct FilterTreeParams {
    pub min_leaf_size: usize,
    pub num_classes: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for FilterTreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterTreeParams {
    pub fn new() -> Self {
        Self {
            min_leaf_size: 1,
            num_classes: None,
            seed: None,
        }
    }

    /// Nodes with at most `min_leaf_size` examples become leaves.
    pub fn set_min_leaf_size(&mut self, min_leaf_size: usize) -> Result<()> {
        if min_leaf_size < 1 {
            return Err(FilterTreeError::invalid_parameter(
                "min_leaf_size",
                "must be at least 1",
            ));
        }
        self.min_leaf_size = min_leaf_size;
        Ok(())
    }

    /// Fixes the number of classes instead of inferring it from the largest label.
    pub fn set_num_classes(&mut self, num_classes: Option<usize>) -> Result<()> {
        if num_classes.is_some_and(|classes| classes < 1) {
            return Err(FilterTreeError::invalid_parameter(
                "num_classes",
                "must be at least 1",
            ));
        }
        self.num_classes = num_classes;
        Ok(())
    }

    /// Seed for the generator that reseeds randomized filters. `None` draws from entropy.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Re-checks fields that may have been assigned directly.
    pub fn validate(&self) -> Result<()> {
        let mut checked = Self::new();
        checked.set_min_leaf_size(self.min_leaf_size)?;
        checked.set_num_classes(self.num_classes)
    }

    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    pub fn num_classes(&self) -> Option<usize> {
        self.num_classes
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = FilterTreeParams::default();
        assert_eq!(params.min_leaf_size(), 1);
        assert_eq!(params.num_classes(), None);
        assert_eq!(params.seed(), None);
    }

    #[test]
    fn test_setters_validate() {
        let mut params = FilterTreeParams::new();
        assert!(params.set_min_leaf_size(0).is_err());
        assert!(params.set_num_classes(Some(0)).is_err());

        params.set_min_leaf_size(5).unwrap();
        params.set_num_classes(Some(3)).unwrap();
        params.set_seed(Some(9));
        assert_eq!(params.min_leaf_size(), 5);
        assert_eq!(params.num_classes(), Some(3));
        assert_eq!(params.seed(), Some(9));
    }

    #[test]
    fn test_validate_catches_direct_assignment() {
        let mut params = FilterTreeParams::new();
        params.min_leaf_size = 0;
        assert!(matches!(
            params.validate(),
            Err(FilterTreeError::InvalidParameter {
                name: "min_leaf_size",
                ..
            })
        ));
    }
}
