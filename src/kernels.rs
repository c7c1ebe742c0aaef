//! Similarity kernels used by kernel herding.
use crate::error::{FilterTreeError, Result};
use nalgebra::DVector;

/// A symmetric similarity function between two examples.
pub trait Kernel: Clone + Send + Sync {
    fn eval(&self, a: &DVector<f64>, b: &DVector<f64>) -> f64;
}

/// Polynomial kernel `(a·b)^p`, or `(a·b + 1)^p` with lower-order terms.
///
/// The defaults (`p = 1`, no lower-order terms) reduce it to the dot product.
#[derive(Clone, Copy, Debug)]
pub struct PolyKernel {
    exponent: f64,
    use_lower_order: bool,
}

impl Default for PolyKernel {
    fn default() -> Self {
        Self {
            exponent: 1.0,
            use_lower_order: false,
        }
    }
}

impl PolyKernel {
    /// # Errors
    ///
    /// Returns an error if the exponent is not a positive number.
    pub fn new(exponent: f64, use_lower_order: bool) -> Result<Self> {
        if exponent.is_nan() || exponent <= 0.0 {
            return Err(FilterTreeError::invalid_parameter(
                "exponent",
                "must be greater than 0",
            ));
        }
        Ok(Self {
            exponent,
            use_lower_order,
        })
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn use_lower_order(&self) -> bool {
        self.use_lower_order
    }
}

impl Kernel for PolyKernel {
    fn eval(&self, a: &DVector<f64>, b: &DVector<f64>) -> f64 {
        let mut dot = a.dot(b);
        if self.use_lower_order {
            dot += 1.0;
        }
        if self.exponent == 1.0 {
            dot
        } else {
            dot.powf(self.exponent)
        }
    }
}

/// Gaussian kernel `exp(-gamma * |a - b|^2)`.
#[derive(Clone, Copy, Debug)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    /// # Errors
    ///
    /// Returns an error if `gamma` is not a positive number.
    pub fn new(gamma: f64) -> Result<Self> {
        if gamma.is_nan() || gamma <= 0.0 {
            return Err(FilterTreeError::invalid_parameter(
                "gamma",
                "must be greater than 0",
            ));
        }
        Ok(Self { gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RbfKernel {
    fn eval(&self, a: &DVector<f64>, b: &DVector<f64>) -> f64 {
        (-self.gamma * (a - b).norm_squared()).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_poly_kernel_default_is_dot_product() {
        let a = DVector::from_vec(vec![1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, -1.0]);
        assert_eq!(PolyKernel::default().eval(&a, &b), 1.0);
    }

    #[test]
    fn test_poly_kernel_with_lower_order() {
        let a = DVector::from_vec(vec![1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, -1.0]);
        let kernel = PolyKernel::new(2.0, true).unwrap();
        assert_relative_eq!(kernel.eval(&a, &b), 4.0);
    }

    #[test]
    fn test_rbf_kernel() {
        let a = DVector::from_vec(vec![0.0, 0.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let kernel = RbfKernel::new(0.5).unwrap();
        assert_eq!(kernel.eval(&a, &a), 1.0);
        assert_relative_eq!(kernel.eval(&a, &b), (-1.0_f64).exp());
    }

    #[test]
    fn test_kernel_parameter_validation() {
        assert!(PolyKernel::new(0.0, false).is_err());
        assert!(PolyKernel::new(f64::NAN, false).is_err());
        assert!(RbfKernel::new(-1.0).is_err());
    }
}
