//! Tone mapping: histogram equalization and min-max normalization.
//!
//! Both operate per channel. RGB images are equalized channel by channel;
//! there is no luminance-only variant.

use ndarray::{Array2, ArrayView2};

use crate::buffer::Image;

/// 256-bin intensity counts of one channel.
pub type Histogram = [u64; 256];

// ============================================================================
// Histogram
// ============================================================================

fn plane_histogram(plane: ArrayView2<u8>) -> Histogram {
    let mut hist = [0u64; 256];
    for &v in plane.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Per-channel histograms, in channel order.
pub fn histogram(image: &Image) -> Vec<Histogram> {
    (0..image.channels())
        .map(|c| plane_histogram(image.plane(c)))
        .collect()
}

/// Normalized cumulative distribution of a histogram.
///
/// The running sum is taken over the normalized bins, so the last entry is
/// 1.0 up to rounding. An empty histogram yields all zeros.
pub fn cumulative_distribution(hist: &Histogram) -> [f64; 256] {
    let total: u64 = hist.iter().sum();
    let mut cdf = [0.0f64; 256];
    if total == 0 {
        return cdf;
    }

    let mut running = 0.0;
    for (slot, &count) in cdf.iter_mut().zip(hist.iter()) {
        running += count as f64 / total as f64;
        *slot = running;
    }
    cdf
}

// ============================================================================
// Equalization
// ============================================================================

fn equalize_plane(plane: ArrayView2<u8>) -> Array2<u8> {
    let cdf = cumulative_distribution(&plane_histogram(plane));
    let mut lut = [0u8; 256];
    for (entry, &p) in lut.iter_mut().zip(cdf.iter()) {
        // Half-way cases round to even
        *entry = (p * 255.0).round_ties_even().clamp(0.0, 255.0) as u8;
    }
    plane.mapv(|v| lut[v as usize])
}

/// Histogram equalization.
///
/// Each intensity `v` maps to `round(cdf[v] * 255)`.
///
/// # Arguments
/// * `image` - Grayscale or RGB image
///
/// # Returns
/// Equalized image with the input's shape
pub fn equalize_hist(image: &Image) -> Image {
    log::debug!("equalize_hist: shape={:?}", image.shape());
    image.map_planes(equalize_plane)
}

// ============================================================================
// Normalization
// ============================================================================

fn normalize_plane(plane: ArrayView2<u8>) -> Array2<u8> {
    let min = plane.iter().copied().min().unwrap_or(0);
    let max = plane.iter().copied().max().unwrap_or(0);
    if max <= min {
        return plane.to_owned();
    }
    let range = (max - min) as f64;
    plane.mapv(|v| ((v - min) as f64 / range * 255.0) as u8)
}

/// Min-max normalization to the full 0-255 range.
///
/// A channel whose samples are all equal is returned unchanged.
///
/// # Arguments
/// * `image` - Grayscale or RGB image
pub fn normalize(image: &Image) -> Image {
    log::debug!("normalize: shape={:?}", image.shape());
    image.map_planes(normalize_plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_histogram_counts_per_channel() {
        let img = Image::from_raw(2, 1, 3, vec![0, 5, 5, 0, 5, 9]).unwrap();
        let hists = histogram(&img);
        assert_eq!(hists.len(), 3);
        assert_eq!(hists[0][0], 2);
        assert_eq!(hists[1][5], 2);
        assert_eq!(hists[2][5], 1);
        assert_eq!(hists[2][9], 1);
    }

    #[test]
    fn test_cdf_ends_at_one() {
        let img = Image::from_gray(array![[0u8, 64], [128, 255]]);
        let cdf = cumulative_distribution(&histogram(&img)[0]);
        assert_abs_diff_eq!(cdf[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(cdf[127], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(cdf[255], 1.0, epsilon = 1e-12);
        assert!(cdf.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_cdf_of_empty_histogram() {
        assert!(cumulative_distribution(&[0u64; 256]).iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_equalize_two_levels() {
        let img = Image::from_gray(array![[10u8, 10], [20, 20]]);
        let result = equalize_hist(&img);
        // cdf[10] = 0.5 -> round(127.5) = 128 (ties to even), cdf[20] = 1.0 -> 255
        assert_eq!(result.plane(0), array![[128u8, 128], [255, 255]]);
    }

    #[test]
    fn test_equalize_rgb_per_channel() {
        let img = Image::from_raw(2, 1, 3, vec![0, 50, 7, 255, 50, 7]).unwrap();
        let result = equalize_hist(&img);
        assert_eq!(result.into_raw_vec(), vec![128, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_normalize_stretches_range() {
        let img = Image::from_gray(array![[50u8, 100], [150, 60]]);
        let result = normalize(&img);
        // (60 - 50) / 100 * 255 = 25.5 -> 25
        assert_eq!(result.plane(0), array![[0u8, 127], [255, 25]]);
    }

    #[test]
    fn test_normalize_flat_channel_unchanged() {
        let img = Image::from_raw(2, 1, 3, vec![40, 0, 9, 40, 200, 9]).unwrap();
        let result = normalize(&img);
        assert_eq!(result.into_raw_vec(), vec![40, 0, 9, 40, 255, 9]);
    }
}
