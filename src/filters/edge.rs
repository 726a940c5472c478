//! Edge detection filters: Sobel, Prewitt, Roberts, Canny.
//!
//! All operators require a single-channel (grayscale) image; reduce color
//! images with [`crate::filters::grayscale::rgb_to_gray`] first.
//!
//! Sobel, Prewitt and Roberts correlate the image with a horizontal and a
//! vertical kernel using zero padding and combine the two responses as
//! `sqrt(gx² + gy²)`. Canny is delegated to a [`CannyDetector`] backend.

use image::GrayImage;
use ndarray::Zip;

use crate::buffer::Image;
use crate::error::{FilterError, Result};
use crate::filters::convolution::{correlate_plane, BoundaryMode};
use crate::filters::kernels::EdgeOperator;

/// How a gradient magnitude above 255 is cast back to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MagnitudeCast {
    /// Clamp to 255.
    #[default]
    Saturate,
    /// Truncate and keep the low 8 bits (legacy byte-for-byte behavior).
    Wrap,
}

impl MagnitudeCast {
    fn apply(self, magnitude: f64) -> u8 {
        match self {
            MagnitudeCast::Saturate => magnitude.clamp(0.0, 255.0) as u8,
            MagnitudeCast::Wrap => (magnitude as u64 & 0xFF) as u8,
        }
    }
}

// ============================================================================
// Gradient operators
// ============================================================================

/// Gradient magnitude of a grayscale image for one operator.
///
/// # Arguments
/// * `image` - Grayscale image (height, width, 1)
/// * `operator` - Kernel pair to correlate with
/// * `cast` - Overflow policy for magnitudes above 255
///
/// # Returns
/// Gradient-magnitude image with the input's shape
pub fn gradient_magnitude(image: &Image, operator: EdgeOperator, cast: MagnitudeCast) -> Result<Image> {
    image.require_channels(1)?;
    log::debug!(
        "{}: {}x{} cast={:?}",
        operator.name(),
        image.width(),
        image.height(),
        cast
    );

    let (kernel_x, kernel_y) = operator.kernels();
    Ok(image.map_planes(|plane| {
        let gx = correlate_plane(plane, &kernel_x, BoundaryMode::Zero);
        let gy = correlate_plane(plane, &kernel_y, BoundaryMode::Zero);
        Zip::from(&gx)
            .and(&gy)
            .map_collect(|&x, &y| cast.apply((x * x + y * y).sqrt()))
    }))
}

/// Sobel gradient magnitude, saturated at 255.
pub fn sobel(image: &Image) -> Result<Image> {
    gradient_magnitude(image, EdgeOperator::Sobel, MagnitudeCast::Saturate)
}

/// Prewitt gradient magnitude, saturated at 255.
pub fn prewitt(image: &Image) -> Result<Image> {
    gradient_magnitude(image, EdgeOperator::Prewitt, MagnitudeCast::Saturate)
}

/// Roberts cross gradient magnitude, saturated at 255.
pub fn roberts(image: &Image) -> Result<Image> {
    gradient_magnitude(image, EdgeOperator::Roberts, MagnitudeCast::Saturate)
}

// ============================================================================
// Canny
// ============================================================================

/// Canny call parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CannyParams {
    /// Hysteresis lower bound.
    pub low_threshold: f32,
    /// Hysteresis upper bound.
    pub high_threshold: f32,
    /// Sobel aperture side length.
    pub aperture_size: u8,
    /// Use `sqrt(gx² + gy²)` instead of `|gx| + |gy|`.
    pub use_l2_gradient: bool,
}

impl Default for CannyParams {
    fn default() -> Self {
        CannyParams {
            low_threshold: 100.0,
            high_threshold: 200.0,
            aperture_size: 3,
            use_l2_gradient: false,
        }
    }
}

impl CannyParams {
    pub fn new(low_threshold: f32, high_threshold: f32) -> Self {
        CannyParams {
            low_threshold,
            high_threshold,
            ..Default::default()
        }
    }
}

/// A general-purpose Canny implementation the library delegates to.
pub trait CannyDetector {
    /// Return a binary edge map (0 or 255) for `gray`.
    fn detect(&self, gray: &GrayImage, params: &CannyParams) -> Result<GrayImage>;
}

/// Canny backed by `imageproc::edges::canny`.
///
/// imageproc fixes the aperture at 3x3 Sobel, blurs the input with its own
/// Gaussian first and always thresholds the L2 gradient norm. An L1 request
/// is accepted with a warning, so edge maps can differ from an L1 backend.
/// Thresholds given in reverse order are swapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocCanny;

impl CannyDetector for ImageprocCanny {
    fn detect(&self, gray: &GrayImage, params: &CannyParams) -> Result<GrayImage> {
        if params.aperture_size != 3 {
            return Err(FilterError::UnsupportedAperture(params.aperture_size));
        }
        if !params.use_l2_gradient {
            log::warn!("canny: L1 gradient requested, imageproc thresholds the L2 norm");
        }
        let (low, high) = if params.low_threshold > params.high_threshold {
            (params.high_threshold, params.low_threshold)
        } else {
            (params.low_threshold, params.high_threshold)
        };
        Ok(imageproc::edges::canny(gray, low, high))
    }
}

/// Canny edge detection using the imageproc backend.
///
/// The backend always uses the L2 gradient norm after its own Gaussian
/// pre-blur; `use_l2_gradient: false` is not honored. Reversed thresholds
/// are swapped.
///
/// # Arguments
/// * `image` - Grayscale image (height, width, 1)
/// * `params` - Thresholds, aperture and gradient norm
///
/// # Returns
/// Binary edge image (0 or 255)
pub fn canny(image: &Image, params: &CannyParams) -> Result<Image> {
    canny_with(&ImageprocCanny, image, params)
}

/// Canny edge detection through a caller-supplied backend.
pub fn canny_with<D: CannyDetector + ?Sized>(detector: &D, image: &Image, params: &CannyParams) -> Result<Image> {
    if !(params.low_threshold.is_finite() && params.high_threshold.is_finite()) {
        return Err(FilterError::invalid_parameter(
            "threshold",
            "Canny thresholds must be finite",
        ));
    }
    log::debug!(
        "canny: {}x{} low={} high={} aperture={} l2={}",
        image.width(),
        image.height(),
        params.low_threshold,
        params.high_threshold,
        params.aperture_size,
        params.use_l2_gradient
    );
    let gray = image.to_gray_image()?;
    let edges = detector.detect(&gray, params)?;
    Ok(Image::from(edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn vertical_step(height: usize, width: usize, low: u8, high: u8) -> Image {
        Image::from_gray(Array2::from_shape_fn((height, width), |(_, x)| {
            if x < width / 2 {
                low
            } else {
                high
            }
        }))
    }

    #[test]
    fn test_sobel_symmetric_peak_center_is_zero() {
        let img = Image::from_gray(array![[10u8, 10, 10], [10, 50, 10], [10, 10, 10]]);
        let result = sobel(&img).unwrap();
        assert_eq!(result.plane(0)[[1, 1]], 0);
    }

    #[test]
    fn test_sobel_detects_vertical_edge() {
        let img = vertical_step(5, 6, 0, 100);
        let result = sobel(&img).unwrap();
        // Interior row, on the step: |gx| = 4 * 100
        assert_eq!(result.plane(0)[[2, 3]], 255);
        // Flat interior region
        assert_eq!(result.plane(0)[[2, 1]], 0);
    }

    #[test]
    fn test_sobel_legacy_wrap() {
        let img = vertical_step(5, 6, 0, 100);
        let result = gradient_magnitude(&img, EdgeOperator::Sobel, MagnitudeCast::Wrap).unwrap();
        // gx = 400, gy = 0 -> 400 mod 256
        assert_eq!(result.plane(0)[[2, 3]], (400u32 % 256) as u8);
    }

    #[test]
    fn test_prewitt_step_magnitude() {
        let img = vertical_step(5, 6, 0, 20);
        let result = prewitt(&img).unwrap();
        // gx = 3 * 20 on both sides of the step
        assert_eq!(result.plane(0)[[2, 2]], 60);
        assert_eq!(result.plane(0)[[2, 3]], 60);
    }

    #[test]
    fn test_roberts_diagonal_response() {
        let img = Image::from_gray(array![[0u8, 0, 0], [0, 90, 0], [0, 0, 0]]);
        let result = roberts(&img).unwrap();
        // Footprint of (1,1) covers rows/cols 0..=1; only the 90 at [1][1]
        // contributes, through weight -1 in x and 0 in y.
        assert_eq!(result.plane(0)[[1, 1]], 90);
        // (2,2) sees the 90 at its top-left: x weight 1, y weight 0
        assert_eq!(result.plane(0)[[2, 2]], 90);
    }

    #[test]
    fn test_edges_require_grayscale() {
        let img = Image::zeros(3, 3, 3).unwrap();
        let err = sobel(&img).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidChannelCount {
                expected: "1",
                actual: 3
            }
        );
        assert!(canny(&img, &CannyParams::default()).is_err());
    }

    #[test]
    fn test_canny_is_binary() {
        let img = vertical_step(16, 16, 0, 255);
        let result = canny(&img, &CannyParams::new(50.0, 100.0)).unwrap();
        assert_eq!(result.shape(), (16, 16, 1));
        assert!(result.view().iter().all(|&v| v == 0 || v == 255));
        assert!(result.view().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_canny_rejects_other_apertures() {
        let img = vertical_step(8, 8, 0, 255);
        let params = CannyParams {
            aperture_size: 5,
            ..Default::default()
        };
        assert_eq!(
            canny(&img, &params).unwrap_err(),
            FilterError::UnsupportedAperture(5)
        );
    }

    #[test]
    fn test_canny_swaps_reversed_thresholds() {
        let img = vertical_step(16, 16, 0, 255);
        let ordered = canny(&img, &CannyParams::new(100.0, 200.0)).unwrap();
        let reversed = canny(&img, &CannyParams::new(200.0, 100.0)).unwrap();
        assert_eq!(reversed, ordered);
        assert!(reversed.view().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_canny_accepts_l1_request() {
        let img = vertical_step(16, 16, 0, 255);
        let l1 = canny(&img, &CannyParams::new(50.0, 100.0)).unwrap();
        let l2 = canny(
            &img,
            &CannyParams {
                use_l2_gradient: true,
                ..CannyParams::new(50.0, 100.0)
            },
        )
        .unwrap();
        assert_eq!(l1, l2);
    }

    struct Inverting;

    impl CannyDetector for Inverting {
        fn detect(&self, gray: &GrayImage, _params: &CannyParams) -> Result<GrayImage> {
            let mut out = gray.clone();
            out.pixels_mut().for_each(|p| p[0] = 255 - p[0]);
            Ok(out)
        }
    }

    #[test]
    fn test_canny_with_custom_backend() {
        let img = Image::from_gray(array![[0u8, 255]]);
        let result = canny_with(&Inverting, &img, &CannyParams::default()).unwrap();
        assert_eq!(result.plane(0), array![[255u8, 0]]);
    }
}
