//! RGB to grayscale reduction.
//!
//! Uses ITU-R BT.709 luminosity coefficients, not the unweighted average.

use ndarray::Zip;

use crate::buffer::Image;
use crate::error::Result;

/// ITU-R BT.709 luminosity coefficients
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Luminance of one RGB sample, rounded.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB image to a single-channel grayscale image.
///
/// # Arguments
/// * `image` - RGB image (height, width, 3)
///
/// # Returns
/// Grayscale image (height, width, 1)
pub fn rgb_to_gray(image: &Image) -> Result<Image> {
    image.require_channels(3)?;
    log::debug!("rgb_to_gray: {}x{}", image.width(), image.height());

    let gray = Zip::from(image.plane(0))
        .and(image.plane(1))
        .and(image.plane(2))
        .par_map_collect(|&r, &g, &b| luminance(r, g, b));
    Ok(Image::from_gray(gray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn test_pure_red() {
        let img = Image::from_raw(1, 1, 3, vec![255, 0, 0]).unwrap();
        let result = rgb_to_gray(&img).unwrap();
        assert_eq!(result.shape(), (1, 1, 1));
        assert_eq!(result.into_raw_vec(), vec![54]);
    }

    #[test]
    fn test_primaries_and_white() {
        assert_eq!(luminance(0, 255, 0), 182);
        assert_eq!(luminance(0, 0, 255), 18);
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
    }

    #[test]
    fn test_gray_input_unchanged_by_weights() {
        let img = Image::from_raw(2, 1, 3, vec![100, 100, 100, 7, 7, 7]).unwrap();
        let result = rgb_to_gray(&img).unwrap();
        assert_eq!(result.into_raw_vec(), vec![100, 7]);
    }

    #[test]
    fn test_requires_three_channels() {
        let img = Image::zeros(2, 2, 1).unwrap();
        assert_eq!(
            rgb_to_gray(&img).unwrap_err(),
            FilterError::InvalidChannelCount {
                expected: "3",
                actual: 1
            }
        );
    }
}
