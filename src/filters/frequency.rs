//! Frequency-domain filters: ideal circular low-pass and high-pass.
//!
//! Per channel: forward 2D DFT, shift the zero frequency to
//! `(rows / 2, cols / 2)`, multiply by a circular binary mask, shift back,
//! inverse DFT, keep the real part.
//!
//! ## Post-processing
//!
//! - **Low-pass**: clamp to 0-255 and truncate.
//! - **High-pass**: min-max stretch to 0-255 and truncate; the response is
//!   centered near zero.
//!
//! Color images are filtered channel by channel with the same radius.

use std::sync::Arc;

use ndarray::{Array2, Array3, ArrayView2, Axis, Zip};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::buffer::Image;
use crate::error::{FilterError, Result};
use crate::filters::convolution::clamp_to_u8;

/// Stretches narrower than this are treated as flat.
const FLAT_RANGE: f64 = 1e-9;

/// Which side of the radius survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterKind {
    /// Keep frequencies within the radius.
    LowPass,
    /// Keep frequencies outside the radius.
    HighPass,
}

// ============================================================================
// Transform helpers
// ============================================================================

fn transform_lanes(data: &mut Array2<Complex<f64>>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    Zip::from(data.lanes_mut(axis)).par_for_each(|mut lane| {
        let mut buffer: Vec<Complex<f64>> = lane.to_vec();
        fft.process(&mut buffer);
        for (dst, src) in lane.iter_mut().zip(buffer) {
            *dst = src;
        }
    });
}

/// In-place 2D DFT (rows, then columns). The inverse is scaled by `1 / (rows * cols)`.
pub fn fft_2d(data: &mut Array2<Complex<f64>>, inverse: bool) {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let mut planner = FftPlanner::<f64>::new();
    let (row_fft, col_fft) = if inverse {
        (planner.plan_fft_inverse(cols), planner.plan_fft_inverse(rows))
    } else {
        (planner.plan_fft_forward(cols), planner.plan_fft_forward(rows))
    };

    transform_lanes(data, Axis(1), &row_fft);
    transform_lanes(data, Axis(0), &col_fft);

    if inverse {
        let scale = 1.0 / (rows * cols) as f64;
        data.mapv_inplace(|v| v * scale);
    }
}

/// Move the zero-frequency bin from `(0, 0)` to `(rows / 2, cols / 2)`.
pub fn fft_shift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        data[[(y + rows - rows / 2) % rows, (x + cols - cols / 2) % cols]].clone()
    })
}

/// Inverse of [`fft_shift`], also for odd sizes.
pub fn ifft_shift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (rows, cols) = data.dim();
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        data[[(y + rows / 2) % rows, (x + cols / 2) % cols]].clone()
    })
}

/// Binary mask centered at `(rows / 2, cols / 2)`.
///
/// Low-pass masks are 1 within `radius` (inclusive) and 0 outside;
/// high-pass masks are the complement.
pub fn circular_mask(rows: usize, cols: usize, radius: f64, kind: FilterKind) -> Array2<u8> {
    let (center_y, center_x) = ((rows / 2) as f64, (cols / 2) as f64);
    let radius_sq = radius * radius;
    Array2::from_shape_fn((rows, cols), |(y, x)| {
        let dy = y as f64 - center_y;
        let dx = x as f64 - center_x;
        let inside = dy * dy + dx * dx <= radius_sq;
        match (kind, inside) {
            (FilterKind::LowPass, true) | (FilterKind::HighPass, false) => 1,
            _ => 0,
        }
    })
}

fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(FilterError::invalid_parameter(
            "radius",
            format!("must be a non-negative number, got {radius}"),
        ));
    }
    Ok(())
}

fn to_complex(plane: ArrayView2<u8>) -> Array2<Complex<f64>> {
    plane.mapv(|v| Complex::new(v as f64, 0.0))
}

/// Masked inverse transform of one plane; real part, no clamping.
fn filter_plane_raw(plane: ArrayView2<u8>, radius: f64, kind: FilterKind) -> Array2<f64> {
    let (rows, cols) = plane.dim();

    let mut spectrum = to_complex(plane);
    fft_2d(&mut spectrum, false);
    let mut centered = fft_shift(&spectrum);

    let mask = circular_mask(rows, cols, radius, kind);
    Zip::from(&mut centered).and(&mask).for_each(|bin, &m| {
        if m == 0 {
            *bin = Complex::new(0.0, 0.0);
        }
    });

    let mut restored = ifft_shift(&centered);
    fft_2d(&mut restored, true);
    restored.mapv(|v| v.re)
}

/// Full min-max stretch to 0-255. A flat plane maps to 0.
fn stretch_to_u8(values: &Array2<f64>, op: &str) -> Array2<u8> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !(range > FLAT_RANGE) {
        log::debug!("{op}: flat response, emitting zeros");
        return Array2::zeros(values.dim());
    }
    values.mapv(|v| clamp_to_u8((v - min) / range * 255.0))
}

// ============================================================================
// Public filters
// ============================================================================

/// Unclamped real-valued response of the masked inverse transform.
///
/// Low-pass and high-pass responses of the same radius sum to the input.
///
/// # Returns
/// `(height, width, channels)` array of f64
pub fn frequency_response(image: &Image, radius: f64, kind: FilterKind) -> Result<Array3<f64>> {
    validate_radius(radius)?;
    let (height, width, channels) = image.shape();
    let mut output = Array3::<f64>::zeros((height, width, channels));
    for c in 0..channels {
        let response = filter_plane_raw(image.plane(c), radius, kind);
        output.index_axis_mut(Axis(2), c).assign(&response);
    }
    Ok(output)
}

/// Apply an ideal low-pass filter.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `radius` - Cutoff radius in frequency bins (pixels of the centered spectrum)
///
/// # Returns
/// Filtered image with the input's shape
pub fn low_pass(image: &Image, radius: f64) -> Result<Image> {
    validate_radius(radius)?;
    log::debug!("low_pass: shape={:?} radius={}", image.shape(), radius);
    Ok(image.map_planes(|plane| {
        filter_plane_raw(plane, radius, FilterKind::LowPass).mapv(clamp_to_u8)
    }))
}

/// Apply an ideal high-pass filter with a min-max stretched result.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `radius` - Cutoff radius; frequencies within it are removed
pub fn high_pass(image: &Image, radius: f64) -> Result<Image> {
    validate_radius(radius)?;
    log::debug!("high_pass: shape={:?} radius={}", image.shape(), radius);
    Ok(image.map_planes(|plane| {
        stretch_to_u8(&filter_plane_raw(plane, radius, FilterKind::HighPass), "high_pass")
    }))
}

/// Dispatch on [`FilterKind`].
pub fn frequency_filter(image: &Image, radius: f64, kind: FilterKind) -> Result<Image> {
    match kind {
        FilterKind::LowPass => low_pass(image, radius),
        FilterKind::HighPass => high_pass(image, radius),
    }
}

/// Centered log-magnitude spectrum, `ln(1 + |F|)` stretched to 0-255.
pub fn magnitude_spectrum(image: &Image) -> Image {
    log::debug!("magnitude_spectrum: shape={:?}", image.shape());
    image.map_planes(|plane| {
        let mut spectrum = to_complex(plane);
        fft_2d(&mut spectrum, false);
        let log_magnitude = fft_shift(&spectrum).mapv(|v| v.norm().ln_1p());
        stretch_to_u8(&log_magnitude, "magnitude_spectrum")
    })
}
