//! Denoise filters: Average, Gaussian, Median.
//!
//! All three use reflect padding (`kernel_size / 2` on each side) and work
//! on grayscale or RGB images, filtering each channel independently.

use crate::buffer::Image;
use crate::error::Result;
use crate::filters::convolution::{correlate, BoundaryMode, Statistic};
use crate::filters::kernels::Kernel;

/// Mean filter over a `kernel_size x kernel_size` window.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `kernel_size` - Window side length (>= 1)
///
/// # Returns
/// Smoothed image with the input's shape
pub fn average_filter(image: &Image, kernel_size: usize) -> Result<Image> {
    let kernel = Kernel::uniform(kernel_size)?;
    log::debug!("average_filter: shape={:?} k={}", image.shape(), kernel_size);
    Ok(correlate(image, &kernel, BoundaryMode::Reflect, Statistic::WeightedSum))
}

/// Gaussian filter with a generated, normalized kernel.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `kernel_size` - Window side length (>= 1)
/// * `sigma` - Standard deviation of the Gaussian (> 0)
pub fn gaussian_filter(image: &Image, kernel_size: usize, sigma: f64) -> Result<Image> {
    let kernel = Kernel::gaussian(kernel_size, sigma)?;
    log::debug!(
        "gaussian_filter: shape={:?} k={} sigma={}",
        image.shape(),
        kernel_size,
        sigma
    );
    Ok(correlate(image, &kernel, BoundaryMode::Reflect, Statistic::WeightedSum))
}

/// Median filter.
///
/// Removes salt-and-pepper noise while preserving edges.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `kernel_size` - Window side length (>= 1)
pub fn median_filter(image: &Image, kernel_size: usize) -> Result<Image> {
    let footprint = Kernel::uniform(kernel_size)?;
    log::debug!("median_filter: shape={:?} k={}", image.shape(), kernel_size);
    Ok(correlate(image, &footprint, BoundaryMode::Reflect, Statistic::Median))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use ndarray::{array, Array2};

    #[test]
    fn test_average_preserves_flat_rgb() {
        let img = Image::from_raw(3, 3, 3, [30u8, 60, 90].repeat(9)).unwrap();
        let result = average_filter(&img, 3).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_average_rejects_zero_kernel() {
        let img = Image::zeros(2, 2, 1).unwrap();
        assert_eq!(
            average_filter(&img, 0).unwrap_err(),
            FilterError::InvalidKernelSize(0)
        );
    }

    #[test]
    fn test_gaussian_smooths_impulse() {
        let mut plane = Array2::<u8>::zeros((5, 5));
        plane[[2, 2]] = 255;
        let img = Image::from_gray(plane);

        let result = gaussian_filter(&img, 3, 1.0).unwrap();
        let out = result.plane(0);

        assert!(out[[2, 2]] < 255);
        assert!(out[[2, 2]] > out[[1, 2]]);
        assert!(out[[1, 2]] > out[[1, 1]]);
        assert_eq!(out[[0, 0]], 0);
    }

    #[test]
    fn test_gaussian_rejects_nonpositive_sigma() {
        let img = Image::zeros(2, 2, 1).unwrap();
        assert!(gaussian_filter(&img, 3, -1.0).is_err());
    }

    #[test]
    fn test_median_removes_salt() {
        let img = Image::from_gray(array![
            [10u8, 10, 10, 10],
            [10, 255, 10, 10],
            [10, 10, 10, 0],
            [10, 10, 10, 10]
        ]);
        let result = median_filter(&img, 3).unwrap();
        assert!(result.view().iter().all(|&v| v == 10));
    }

    #[test]
    fn test_kernel_size_one_is_identity() {
        let img = Image::from_gray(array![[1u8, 2], [3, 4]]);
        assert_eq!(average_filter(&img, 1).unwrap(), img);
        assert_eq!(median_filter(&img, 1).unwrap(), img);
        assert_eq!(gaussian_filter(&img, 1, 0.5).unwrap(), img);
    }
}
