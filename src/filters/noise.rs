//! Noise synthesizers: Uniform, Gaussian, Salt-and-Pepper.
//!
//! Additive generators draw one value per sample in channel-interleaved
//! row-major order, truncate it toward zero to an integer, add it in `i32`
//! and clamp back to 0-255.
//!
//! Every generator takes `seed: Option<u64>`. `Some(seed)` is fully
//! reproducible; `None` seeds from the thread RNG.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::buffer::Image;
use crate::error::{FilterError, Result};

/// Uniform noise amplitude per unit of `amount`.
const UNIFORM_SCALE: f64 = 100.0;

/// Salt (and pepper) probability per unit of `amount`.
const IMPULSE_SCALE: f64 = 0.05;

fn seeded_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(|| rand::rng().next_u64()))
}

/// Clamp to non-negative; NaN and infinities are rejected.
fn clamp_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(FilterError::invalid_parameter(
            "amount",
            format!("must be finite, got {amount}"),
        ));
    }
    Ok(amount.max(0.0))
}

fn add_integer_noise(image: &Image, mut draw: impl FnMut() -> i32) -> Image {
    let mut data = image.view().to_owned();
    // Sequential so that a seed maps to one fixed sample order
    data.iter_mut()
        .for_each(|v| *v = (*v as i32).saturating_add(draw()).clamp(0, 255) as u8);
    Image::from_valid(data)
}

// ============================================================================
// Additive noise
// ============================================================================

/// Add uniformly distributed noise in `[-A, A]`, `A = trunc(amount * 100)`.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `amount` - Noise strength; values below 0 are treated as 0
/// * `seed` - Optional RNG seed
///
/// # Returns
/// Noisy image with the input's shape
pub fn add_uniform_noise(image: &Image, amount: f64, seed: Option<u64>) -> Result<Image> {
    let amplitude = (clamp_amount(amount)? * UNIFORM_SCALE).trunc();
    log::debug!(
        "add_uniform_noise: shape={:?} amplitude={} seed={:?}",
        image.shape(),
        amplitude,
        seed
    );
    if amplitude == 0.0 {
        return Ok(image.clone());
    }

    let mut rng = seeded_rng(seed);
    Ok(add_integer_noise(image, || {
        rng.random_range(-amplitude..=amplitude) as i32
    }))
}

/// Add normally distributed noise.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `mean` - Mean of the noise distribution
/// * `stddev` - Standard deviation (>= 0)
/// * `seed` - Optional RNG seed
pub fn add_gaussian_noise(image: &Image, mean: f64, stddev: f64, seed: Option<u64>) -> Result<Image> {
    if !mean.is_finite() {
        return Err(FilterError::invalid_parameter(
            "mean",
            format!("must be finite, got {mean}"),
        ));
    }
    let normal = Normal::new(mean, stddev)
        .ok()
        .filter(|_| stddev.is_finite())
        .ok_or_else(|| {
            FilterError::invalid_parameter(
                "stddev",
                format!("must be a non-negative number, got {stddev}"),
            )
        })?;
    log::debug!(
        "add_gaussian_noise: shape={:?} mean={} stddev={} seed={:?}",
        image.shape(),
        mean,
        stddev,
        seed
    );

    let mut rng = seeded_rng(seed);
    Ok(add_integer_noise(image, || normal.sample(&mut rng) as i32))
}

// ============================================================================
// Impulse noise
// ============================================================================

/// Number of salt (and of pepper) hits: `floor(amount * 0.05 * h * w * c)`.
pub fn impulse_count(amount: f64, height: usize, width: usize, channels: usize) -> usize {
    (amount.max(0.0) * IMPULSE_SCALE * (height * width * channels) as f64) as usize
}

/// Add salt (255) and pepper (0) impulses.
///
/// Salt is placed first, then pepper. Coordinates are drawn independently
/// and may repeat. On color images each hit sets one randomly chosen
/// channel, producing colored speckle; grayscale hits set the pixel.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `amount` - Noise strength; 0 leaves the image unchanged
/// * `seed` - Optional RNG seed
pub fn add_salt_and_pepper_noise(image: &Image, amount: f64, seed: Option<u64>) -> Result<Image> {
    let amount = clamp_amount(amount)?;
    let (height, width, channels) = image.shape();
    let hits = impulse_count(amount, height, width, channels);
    log::debug!(
        "add_salt_and_pepper_noise: shape={:?} hits={}x2 seed={:?}",
        image.shape(),
        hits,
        seed
    );

    let mut data: Array3<u8> = image.view().to_owned();
    if hits == 0 {
        return Ok(Image::from_valid(data));
    }

    let mut rng = seeded_rng(seed);
    for value in [255u8, 0u8] {
        for _ in 0..hits {
            let y = rng.random_range(0..height);
            let x = rng.random_range(0..width);
            if channels == 1 {
                data[[y, x, 0]] = value;
            } else {
                let c = rng.random_range(0..channels);
                data[[y, x, c]] = value;
            }
        }
    }

    Ok(Image::from_valid(data))
}
