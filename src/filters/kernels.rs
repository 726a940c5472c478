//! Kernel factory: fixed edge operators and parametric smoothing kernels.
//!
//! A [`Kernel`] carries its weights together with the border padding the
//! convolution engine should use. Odd kernels pad by `side / 2` on each
//! axis. Roberts is the one exception: its 2x2 kernels always pad by
//! exactly 1, and the padding is fixed here rather than inferred from size.

use ndarray::{array, Array2, ArrayView2};

use crate::error::{FilterError, Result};

/// A correlation kernel plus its border padding `(rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
    padding: (usize, usize),
}

impl Kernel {
    /// Kernel padded by half its size on each axis.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || cols == 0 {
            return Err(FilterError::InvalidKernelSize(rows.min(cols)));
        }
        Ok(Kernel {
            weights,
            padding: (rows / 2, cols / 2),
        })
    }

    /// Kernel with an explicit padding that ignores its size.
    pub fn with_padding(weights: Array2<f64>, padding: usize) -> Result<Self> {
        let mut kernel = Kernel::new(weights)?;
        kernel.padding = (padding, padding);
        Ok(kernel)
    }

    /// `size x size` box kernel, every weight `1 / size²`.
    pub fn uniform(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(FilterError::InvalidKernelSize(size));
        }
        let weight = 1.0 / (size * size) as f64;
        Kernel::new(Array2::from_elem((size, size), weight))
    }

    /// Generate a normalized 2D Gaussian kernel.
    ///
    /// Sample positions are `size` evenly spaced points from `-(size/2)` to
    /// `size/2` on each axis, so even sizes land on fractional offsets.
    ///
    /// # Arguments
    /// * `size` - Side length (>= 1)
    /// * `sigma` - Standard deviation (> 0)
    pub fn gaussian(size: usize, sigma: f64) -> Result<Self> {
        if size == 0 {
            return Err(FilterError::InvalidKernelSize(size));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(FilterError::invalid_parameter(
                "sigma",
                format!("must be a positive number, got {sigma}"),
            ));
        }

        let half = (size / 2) as f64;
        let axis: Vec<f64> = if size == 1 {
            vec![0.0]
        } else {
            let step = 2.0 * half / (size - 1) as f64;
            (0..size).map(|i| -half + i as f64 * step).collect()
        };

        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut weights = Array2::from_shape_fn((size, size), |(y, x)| {
            (-(axis[x] * axis[x] + axis[y] * axis[y]) / two_sigma_sq).exp()
        });

        // Normalize
        let sum = weights.sum();
        weights.mapv_inplace(|v| v / sum);

        Kernel::new(weights)
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// `(rows, cols)`
    pub fn size(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Border padding `(rows, cols)` used when this kernel is correlated.
    pub fn padding(&self) -> (usize, usize) {
        self.padding
    }

    fn fixed(weights: Array2<f64>, padding: usize) -> Self {
        Kernel {
            weights,
            padding: (padding, padding),
        }
    }
}

/// Gradient operators with a fixed horizontal/vertical kernel pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeOperator {
    Sobel,
    Prewitt,
    Roberts,
}

impl EdgeOperator {
    /// `(horizontal, vertical)` kernels.
    pub fn kernels(self) -> (Kernel, Kernel) {
        match self {
            EdgeOperator::Sobel => (
                Kernel::fixed(array![[-1., 0., 1.], [-2., 0., 2.], [-1., 0., 1.]], 1),
                Kernel::fixed(array![[-1., -2., -1.], [0., 0., 0.], [1., 2., 1.]], 1),
            ),
            EdgeOperator::Prewitt => (
                Kernel::fixed(array![[-1., 0., 1.], [-1., 0., 1.], [-1., 0., 1.]], 1),
                Kernel::fixed(array![[-1., -1., -1.], [0., 0., 0.], [1., 1., 1.]], 1),
            ),
            // 2x2 diagonal pair, always padded by 1
            EdgeOperator::Roberts => (
                Kernel::fixed(array![[1., 0.], [0., -1.]], 1),
                Kernel::fixed(array![[0., 1.], [-1., 0.]], 1),
            ),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeOperator::Sobel => "sobel",
            EdgeOperator::Prewitt => "prewitt",
            EdgeOperator::Roberts => "roberts",
        }
    }
}
