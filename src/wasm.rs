//! WebAssembly exports for ImageLab filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat, row-major, channel-interleaved byte
//! arrays of length `width * height * channels`, with `channels` 1 or 3.
//! Invalid dimensions or parameters throw a JS exception.
//!
//! Noise exports take an explicit seed; there is no entropy source here.

use wasm_bindgen::prelude::*;

use crate::buffer::Image;
use crate::error::FilterError;
use crate::filters::edge::{self, CannyParams};
use crate::filters::{denoise, frequency, grayscale, hybrid, noise, tone};
use crate::filters::threshold as threshold_mod;

fn js_error(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_image(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Image, JsValue> {
    Image::from_raw(width, height, channels, data.to_vec()).map_err(js_error)
}

fn finish(result: crate::error::Result<Image>) -> Result<Vec<u8>, JsValue> {
    result.map(Image::into_raw_vec).map_err(js_error)
}

// ============================================================================
// Edge Detection (1 channel)
// ============================================================================

/// Sobel gradient magnitude.
///
/// # Arguments
/// * `data` - Flat grayscale bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat grayscale bytes
#[wasm_bindgen]
pub fn sobel_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    finish(edge::sobel(&to_image(data, width, height, 1)?))
}

#[wasm_bindgen]
pub fn prewitt_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    finish(edge::prewitt(&to_image(data, width, height, 1)?))
}

#[wasm_bindgen]
pub fn roberts_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    finish(edge::roberts(&to_image(data, width, height, 1)?))
}

/// Canny edges with a 3x3 aperture.
#[wasm_bindgen]
pub fn canny_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<Vec<u8>, JsValue> {
    let params = CannyParams::new(low_threshold, high_threshold);
    finish(edge::canny(&to_image(data, width, height, 1)?, &params))
}

// ============================================================================
// Denoise
// ============================================================================

#[wasm_bindgen]
pub fn average_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
) -> Result<Vec<u8>, JsValue> {
    finish(denoise::average_filter(&to_image(data, width, height, channels)?, kernel_size))
}

#[wasm_bindgen]
pub fn gaussian_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
    sigma: f64,
) -> Result<Vec<u8>, JsValue> {
    finish(denoise::gaussian_filter(
        &to_image(data, width, height, channels)?,
        kernel_size,
        sigma,
    ))
}

#[wasm_bindgen]
pub fn median_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
) -> Result<Vec<u8>, JsValue> {
    finish(denoise::median_filter(&to_image(data, width, height, channels)?, kernel_size))
}

// ============================================================================
// Frequency Domain
// ============================================================================

#[wasm_bindgen]
pub fn low_pass_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    radius: f64,
) -> Result<Vec<u8>, JsValue> {
    finish(frequency::low_pass(&to_image(data, width, height, channels)?, radius))
}

#[wasm_bindgen]
pub fn high_pass_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    radius: f64,
) -> Result<Vec<u8>, JsValue> {
    finish(frequency::high_pass(&to_image(data, width, height, channels)?, radius))
}

// ============================================================================
// Noise
// ============================================================================

#[wasm_bindgen]
pub fn uniform_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    amount: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height, channels)?;
    finish(noise::add_uniform_noise(&image, amount, Some(seed)))
}

#[wasm_bindgen]
pub fn gaussian_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    mean: f64,
    stddev: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height, channels)?;
    finish(noise::add_gaussian_noise(&image, mean, stddev, Some(seed)))
}

#[wasm_bindgen]
pub fn salt_pepper_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    amount: f64,
    seed: u64,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height, channels)?;
    finish(noise::add_salt_and_pepper_noise(&image, amount, Some(seed)))
}

// ============================================================================
// Tone Mapping and Thresholding
// ============================================================================

#[wasm_bindgen]
pub fn equalize_hist_wasm(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Vec<u8>, JsValue> {
    Ok(tone::equalize_hist(&to_image(data, width, height, channels)?).into_raw_vec())
}

#[wasm_bindgen]
pub fn normalize_wasm(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Vec<u8>, JsValue> {
    Ok(tone::normalize(&to_image(data, width, height, channels)?).into_raw_vec())
}

#[wasm_bindgen]
pub fn global_threshold_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    threshold: u8,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height, channels)?;
    Ok(threshold_mod::global_threshold(&image, threshold).into_raw_vec())
}

/// Adaptive mean threshold of a grayscale buffer.
#[wasm_bindgen]
pub fn local_threshold_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    block_size: usize,
    c: f64,
) -> Result<Vec<u8>, JsValue> {
    finish(threshold_mod::local_threshold(&to_image(data, width, height, 1)?, block_size, c))
}

// ============================================================================
// Color Reduction and Hybrid
// ============================================================================

/// RGB buffer in, grayscale buffer (length = width * height) out.
#[wasm_bindgen]
pub fn rgb_to_gray_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    finish(grayscale::rgb_to_gray(&to_image(data, width, height, 3)?))
}

/// Both sources share `width`, `height` and `channels`.
#[wasm_bindgen]
pub fn generate_hybrid_wasm(
    low_data: &[u8],
    high_data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    low_radius: f64,
    high_radius: f64,
) -> Result<Vec<u8>, JsValue> {
    let low = to_image(low_data, width, height, channels)?;
    let high = to_image(high_data, width, height, channels)?;
    finish(hybrid::generate_hybrid_image(&low, &high, low_radius, high_radius))
}
