//! Hybrid image composer.
//!
//! Low frequencies of one image are blended with the high frequencies of
//! another, so the result reads as the first image from afar and the second
//! up close.

use ndarray::Zip;

use crate::buffer::Image;
use crate::error::Result;
use crate::filters::frequency::{high_pass, low_pass};

/// Cutoff radii for [`generate_hybrid_image`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridParams {
    /// Low-pass radius applied to the low-frequency source.
    pub low_radius: f64,
    /// High-pass radius applied to the high-frequency source.
    pub high_radius: f64,
}

impl Default for HybridParams {
    fn default() -> Self {
        HybridParams {
            low_radius: 20.0,
            high_radius: 5.0,
        }
    }
}

/// Blend `low_pass(low_source)` and `high_pass(high_source)` with equal weights.
///
/// Each output sample is `round(0.5 * low + 0.5 * high)`, half-way cases
/// rounding to even.
///
/// # Arguments
/// * `low_source` - Image contributing low frequencies
/// * `high_source` - Image contributing high frequencies; same shape as `low_source`
/// * `low_radius` - Low-pass cutoff radius
/// * `high_radius` - High-pass cutoff radius
///
/// # Returns
/// Blended image with the sources' shape
pub fn generate_hybrid_image(
    low_source: &Image,
    high_source: &Image,
    low_radius: f64,
    high_radius: f64,
) -> Result<Image> {
    low_source.require_same_shape(high_source)?;
    log::debug!(
        "generate_hybrid_image: shape={:?} low_radius={} high_radius={}",
        low_source.shape(),
        low_radius,
        high_radius
    );

    let (low, high) = rayon::join(
        || low_pass(low_source, low_radius),
        || high_pass(high_source, high_radius),
    );
    let (low, high) = (low?, high?);

    let blended = Zip::from(low.view())
        .and(high.view())
        .par_map_collect(|&l, &h| (0.5 * l as f64 + 0.5 * h as f64).round_ties_even() as u8);
    Ok(Image::from_valid(blended))
}

/// [`generate_hybrid_image`] with radii taken from `params`.
pub fn generate_hybrid_image_with(low_source: &Image, high_source: &Image, params: &HybridParams) -> Result<Image> {
    generate_hybrid_image(low_source, high_source, params.low_radius, params.high_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use ndarray::{array, Array2};

    #[test]
    fn test_shape_mismatch() {
        let a = Image::zeros(4, 4, 1).unwrap();
        let b = Image::zeros(4, 5, 1).unwrap();
        assert!(matches!(
            generate_hybrid_image(&a, &b, 20.0, 5.0),
            Err(FilterError::ShapeMismatch { .. })
        ));

        let rgb = Image::zeros(4, 4, 3).unwrap();
        assert!(generate_hybrid_image(&a, &rgb, 20.0, 5.0).is_err());
    }

    #[test]
    fn test_flat_high_source_halves_low_pass() {
        let low = Image::from_gray(Array2::from_elem((6, 6), 200u8));
        let high = Image::from_gray(Array2::from_elem((6, 6), 30u8));
        // Flat high-pass response stretches to 0
        let result = generate_hybrid_image(&low, &high, 20.0, 5.0).unwrap();
        assert!(result.view().iter().all(|&v| v == 100));
    }

    #[test]
    fn test_blend_rounds_half_to_even() {
        let low = Image::from_gray(array![[1u8, 3], [5, 7]]);
        let high = Image::from_gray(Array2::from_elem((2, 2), 9u8));
        // A wide low-pass keeps the low source intact; the flat high side is 0
        let result = generate_hybrid_image(&low, &high, 100.0, 0.0).unwrap();
        assert_eq!(result.plane(0), array![[0u8, 2], [2, 4]]);
    }

    #[test]
    fn test_default_params() {
        let params = HybridParams::default();
        assert_eq!(params.low_radius, 20.0);
        assert_eq!(params.high_radius, 5.0);

        let img = Image::zeros(3, 3, 3).unwrap();
        let result = generate_hybrid_image_with(&img, &img, &params).unwrap();
        assert_eq!(result.shape(), (3, 3, 3));
    }
}
