//! Convolution engine: spatial correlation with a pluggable border policy.
//!
//! Output sample `(y, x)` is computed from the kernel footprint anchored at
//! `(y - pad_y, x - pad_x)`, where the padding comes from the [`Kernel`].
//! Samples that fall outside the image are synthesized by a
//! [`BoundaryMode`]. Multi-channel images are processed one plane at a time.
//!
//! Two statistics are supported:
//! - **WeightedSum** - sum of `sample * weight` over the footprint, clamped
//!   to 0-255 and truncated
//! - **Median** - median of the footprint samples; weights are ignored

use ndarray::{Array2, ArrayView2, Zip};

use crate::buffer::Image;
use crate::filters::kernels::Kernel;

/// Accumulated float error tolerated below an integer before truncation,
/// so that e.g. nine samples of 10 weighted by 1/9 still cast to 10.
const CAST_EPSILON: f64 = 1e-9;

/// How samples outside the image are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryMode {
    /// Mirror interior samples without repeating the edge (`dcb|abcd|cba`).
    Reflect,
    /// Exterior samples are 0.
    Zero,
    /// Repeat the edge sample (`aaa|abcd|ddd`).
    Replicate,
}

/// Per-footprint statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statistic {
    WeightedSum,
    Median,
}

/// Map a possibly out-of-range coordinate onto `0..len`.
///
/// Returns `None` when the boundary mode synthesizes a zero.
pub fn source_index(index: isize, len: usize, mode: BoundaryMode) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if (0..len as isize).contains(&index) {
        return Some(index as usize);
    }
    match mode {
        BoundaryMode::Zero => None,
        BoundaryMode::Replicate => Some(index.clamp(0, len as isize - 1) as usize),
        BoundaryMode::Reflect => {
            if len == 1 {
                return Some(0);
            }
            let period = 2 * (len as isize - 1);
            let m = index.rem_euclid(period);
            Some(if m >= len as isize { period - m } else { m } as usize)
        }
    }
}

/// Source index for every (output position, kernel tap) pair along one axis,
/// laid out as `out * taps + tap`.
fn tap_table(len: usize, taps: usize, pad: usize, mode: BoundaryMode) -> Vec<Option<usize>> {
    let mut table = Vec::with_capacity(len * taps);
    for i in 0..len {
        for t in 0..taps {
            table.push(source_index(i as isize + t as isize - pad as isize, len, mode));
        }
    }
    table
}

/// Clamp a float sample into 0-255 and truncate.
pub(crate) fn clamp_to_u8(v: f64) -> u8 {
    (v + CAST_EPSILON).clamp(0.0, 255.0) as u8
}

/// Raw weighted-sum correlation of a single plane.
///
/// No clamping is applied, so signed gradients survive.
pub fn correlate_plane(plane: ArrayView2<u8>, kernel: &Kernel, mode: BoundaryMode) -> Array2<f64> {
    let (height, width) = plane.dim();
    let (kh, kw) = kernel.size();
    let (pad_y, pad_x) = kernel.padding();
    let rows = tap_table(height, kh, pad_y, mode);
    let cols = tap_table(width, kw, pad_x, mode);
    let weights = kernel.weights();

    let mut output = Array2::<f64>::zeros((height, width));
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        let mut sum = 0.0f64;
        for ky in 0..kh {
            let Some(sy) = rows[y * kh + ky] else {
                continue;
            };
            for kx in 0..kw {
                let Some(sx) = cols[x * kw + kx] else {
                    continue;
                };
                sum += plane[[sy, sx]] as f64 * weights[[ky, kx]];
            }
        }
        *out = sum;
    });

    output
}

/// Median of a sample window. Even-sized windows average the two middle
/// samples and truncate.
pub(crate) fn median_of(values: &mut [u8]) -> u8 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((values[mid - 1] as u16 + values[mid] as u16) / 2) as u8
    }
}

/// Median filter of a single plane over the kernel's footprint.
pub fn median_plane(plane: ArrayView2<u8>, kernel: &Kernel, mode: BoundaryMode) -> Array2<u8> {
    let (height, width) = plane.dim();
    let (kh, kw) = kernel.size();
    let (pad_y, pad_x) = kernel.padding();
    let rows = tap_table(height, kh, pad_y, mode);
    let cols = tap_table(width, kw, pad_x, mode);

    let mut output = Array2::<u8>::zeros((height, width));
    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        let mut window: Vec<u8> = Vec::with_capacity(kh * kw);
        for ky in 0..kh {
            for kx in 0..kw {
                let sample = match (rows[y * kh + ky], cols[x * kw + kx]) {
                    (Some(sy), Some(sx)) => plane[[sy, sx]],
                    _ => 0,
                };
                window.push(sample);
            }
        }
        *out = median_of(&mut window);
    });

    output
}

/// Correlate every channel of `image` with `kernel`.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `kernel` - Footprint and weights (weights unused for `Median`)
/// * `mode` - Border policy
/// * `statistic` - Weighted sum or median
///
/// # Returns
/// Filtered image with the input's shape
pub fn correlate(image: &Image, kernel: &Kernel, mode: BoundaryMode, statistic: Statistic) -> Image {
    log::trace!(
        "correlate: shape={:?} kernel={:?} mode={:?} statistic={:?}",
        image.shape(),
        kernel.size(),
        mode,
        statistic
    );
    image.map_planes(|plane| match statistic {
        Statistic::WeightedSum => correlate_plane(plane, kernel, mode).mapv(clamp_to_u8),
        Statistic::Median => median_plane(plane, kernel, mode),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::kernels::EdgeOperator;
    use ndarray::array;

    #[test]
    fn test_reflect_index_mirrors_without_edge() {
        assert_eq!(source_index(-1, 4, BoundaryMode::Reflect), Some(1));
        assert_eq!(source_index(-2, 4, BoundaryMode::Reflect), Some(2));
        assert_eq!(source_index(4, 4, BoundaryMode::Reflect), Some(2));
        assert_eq!(source_index(5, 4, BoundaryMode::Reflect), Some(1));
        assert_eq!(source_index(-3, 1, BoundaryMode::Reflect), Some(0));
    }

    #[test]
    fn test_reflect_index_wide_padding() {
        // abc reflected repeatedly: ...c b | a b c | b a b c...
        assert_eq!(source_index(5, 3, BoundaryMode::Reflect), Some(1));
        assert_eq!(source_index(6, 3, BoundaryMode::Reflect), Some(2));
        assert_eq!(source_index(-4, 3, BoundaryMode::Reflect), Some(0));
    }

    #[test]
    fn test_zero_and_replicate_index() {
        assert_eq!(source_index(-1, 4, BoundaryMode::Zero), None);
        assert_eq!(source_index(2, 4, BoundaryMode::Zero), Some(2));
        assert_eq!(source_index(-3, 4, BoundaryMode::Replicate), Some(0));
        assert_eq!(source_index(9, 4, BoundaryMode::Replicate), Some(3));
    }

    #[test]
    fn test_sobel_symmetric_peak_has_zero_gradient() {
        let plane = array![[10u8, 10, 10], [10, 50, 10], [10, 10, 10]];
        let (kx, ky) = EdgeOperator::Sobel.kernels();

        let gx = correlate_plane(plane.view(), &kx, BoundaryMode::Zero);
        let gy = correlate_plane(plane.view(), &ky, BoundaryMode::Zero);

        assert_eq!(gx[[1, 1]], 0.0);
        assert_eq!(gy[[1, 1]], 0.0);
    }

    #[test]
    fn test_zero_padding_at_corner() {
        let plane = array![[10u8, 10, 10], [10, 50, 10], [10, 10, 10]];
        let (kx, _) = EdgeOperator::Sobel.kernels();
        let gx = correlate_plane(plane.view(), &kx, BoundaryMode::Zero);
        // Left column is all zero padding: 0*(-1) + 10*1 + 0*(-2) + 50*2 + 0*(-1) + 10*1
        assert_eq!(gx[[1, 0]], 10.0 + 100.0 + 10.0);
    }

    #[test]
    fn test_average_with_reflect_border() {
        let img = Image::from_gray(array![[0u8, 10, 20]]);
        let kernel = Kernel::uniform(3).unwrap();
        let result = correlate(&img, &kernel, BoundaryMode::Reflect, Statistic::WeightedSum);
        // x=0 sees 10,0,10; x=2 sees 10,20,10
        assert_eq!(result.plane(0), array![[6u8, 10, 13]]);
    }

    #[test]
    fn test_constant_plane_survives_weighted_sum() {
        let img = Image::from_gray(Array2::from_elem((4, 4), 10u8));
        let kernel = Kernel::uniform(3).unwrap();
        let result = correlate(&img, &kernel, BoundaryMode::Reflect, Statistic::WeightedSum);
        assert!(result.view().iter().all(|&v| v == 10));
    }

    #[test]
    fn test_median_removes_spike() {
        let img = Image::from_gray(array![[1u8, 2, 3], [4, 100, 6], [7, 8, 9]]);
        let kernel = Kernel::uniform(3).unwrap();
        let result = correlate(&img, &kernel, BoundaryMode::Reflect, Statistic::Median);
        assert_eq!(result.plane(0)[[1, 1]], 6);
    }

    #[test]
    fn test_median_even_window_truncates_mean() {
        let mut window = [40u8, 10, 30, 21];
        assert_eq!(median_of(&mut window), 25);
    }

    #[test]
    fn test_weighted_sum_clamps() {
        let img = Image::from_gray(array![[200u8, 200], [200, 200]]);
        let kernel = Kernel::new(Array2::from_elem((1, 1), 2.0)).unwrap();
        let result = correlate(&img, &kernel, BoundaryMode::Zero, Statistic::WeightedSum);
        assert!(result.view().iter().all(|&v| v == 255));

        let negative = Kernel::new(Array2::from_elem((1, 1), -1.0)).unwrap();
        let result = correlate(&img, &negative, BoundaryMode::Zero, Statistic::WeightedSum);
        assert!(result.view().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_channels_are_independent() {
        let img = Image::from_raw(2, 1, 3, vec![0, 100, 200, 0, 100, 200]).unwrap();
        let kernel = Kernel::uniform(3).unwrap();
        let result = correlate(&img, &kernel, BoundaryMode::Reflect, Statistic::WeightedSum);
        assert_eq!(result.into_raw_vec(), vec![0, 100, 200, 0, 100, 200]);
    }
}
