//! In-memory raster buffer shared by every filter.
//!
//! ## Layout
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! Samples are row-major and channel-interleaved, matching numpy's
//! `(height, width, channels)` convention. Filters treat a 3-channel image
//! as three independent grayscale planes unless documented otherwise.

use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;

use crate::error::{FilterError, Result};

/// An 8-bit image with 1 or 3 channels.
///
/// `Image` is a plain value: filters borrow it immutably and return a new
/// buffer, so the caller's working copy is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Wrap an `(height, width, channels)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let channels = data.dim().2;
        if channels != 1 && channels != 3 {
            return Err(FilterError::InvalidChannelCount {
                expected: "1 or 3",
                actual: channels,
            });
        }
        Ok(Image { data })
    }

    /// Build an image from interleaved row-major samples.
    pub fn from_raw(width: usize, height: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(FilterError::BufferLength {
                expected: usize::MAX,
                actual: samples.len(),
            })?;
        if samples.len() != expected {
            return Err(FilterError::BufferLength {
                expected,
                actual: samples.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, channels), samples).map_err(|_| {
            FilterError::BufferLength {
                expected,
                actual: expected,
            }
        })?;
        Image::from_array(data)
    }

    /// Single-channel image from a 2D plane.
    pub fn from_gray(plane: Array2<u8>) -> Self {
        Image {
            data: plane.insert_axis(Axis(2)),
        }
    }

    /// All-black image.
    pub fn zeros(height: usize, width: usize, channels: usize) -> Result<Self> {
        Image::from_array(Array3::zeros((height, width, channels)))
    }

    /// Wrap an array copied from, or shaped like, an existing image.
    pub(crate) fn from_valid(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim().2, 1 | 3));
        Image { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels() == 1
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// One channel as a 2D view.
    pub fn plane(&self, channel: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), channel)
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved row-major samples.
    pub fn into_raw_vec(self) -> Vec<u8> {
        if self.data.is_standard_layout() {
            self.data.into_raw_vec_and_offset().0
        } else {
            self.data.iter().copied().collect()
        }
    }

    pub(crate) fn require_channels(&self, expected: usize) -> Result<()> {
        if self.channels() != expected {
            return Err(FilterError::InvalidChannelCount {
                expected: if expected == 1 { "1" } else { "3" },
                actual: self.channels(),
            });
        }
        Ok(())
    }

    pub(crate) fn require_same_shape(&self, other: &Image) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(FilterError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    /// Apply `f` to every channel plane independently and restack.
    ///
    /// Channels are processed in parallel; `f` must return a plane of the
    /// same height and width.
    pub fn map_planes<F>(&self, f: F) -> Image
    where
        F: Fn(ArrayView2<u8>) -> Array2<u8> + Sync,
    {
        let planes: Vec<Array2<u8>> = (0..self.channels())
            .into_par_iter()
            .map(|c| f(self.plane(c)))
            .collect();
        self.assemble(planes)
    }

    /// Fallible variant of [`Image::map_planes`].
    pub fn try_map_planes<F>(&self, f: F) -> Result<Image>
    where
        F: Fn(ArrayView2<u8>) -> Result<Array2<u8>> + Sync,
    {
        let planes: Vec<Array2<u8>> = (0..self.channels())
            .into_par_iter()
            .map(|c| f(self.plane(c)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.assemble(planes))
    }

    fn assemble(&self, planes: Vec<Array2<u8>>) -> Image {
        let (height, width, channels) = self.shape();
        let mut data = Array3::<u8>::zeros((height, width, channels));
        for (c, plane) in planes.iter().enumerate() {
            data.index_axis_mut(Axis(2), c).assign(plane);
        }
        Image { data }
    }

    /// Convert to an `image::GrayImage`; requires 1 channel.
    pub fn to_gray_image(&self) -> Result<GrayImage> {
        self.require_channels(1)?;
        Ok(GrayImage::from_fn(
            self.width() as u32,
            self.height() as u32,
            |x, y| Luma([self.data[[y as usize, x as usize, 0]]]),
        ))
    }

    /// Convert to an `image::RgbImage`; requires 3 channels.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        self.require_channels(3)?;
        Ok(RgbImage::from_fn(
            self.width() as u32,
            self.height() as u32,
            |x, y| {
                let (y, x) = (y as usize, x as usize);
                Rgb([
                    self.data[[y, x, 0]],
                    self.data[[y, x, 1]],
                    self.data[[y, x, 2]],
                ])
            },
        ))
    }
}

impl From<GrayImage> for Image {
    fn from(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        let data = Array3::from_shape_fn((height as usize, width as usize, 1), |(y, x, _)| {
            img.get_pixel(x as u32, y as u32)[0]
        });
        Image { data }
    }
}

impl From<RgbImage> for Image {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let data = Array3::from_shape_fn((height as usize, width as usize, 3), |(y, x, c)| {
            img.get_pixel(x as u32, y as u32)[c]
        });
        Image { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_raw_rgb_layout() {
        let img = Image::from_raw(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.shape(), (1, 2, 3));
        assert_eq!(img.plane(0), array![[1, 4]]);
        assert_eq!(img.plane(2), array![[3, 6]]);
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let err = Image::from_raw(2, 2, 1, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            FilterError::BufferLength {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_from_raw_rejects_overflowing_dimensions() {
        let err = Image::from_raw(usize::MAX, 2, 3, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            FilterError::BufferLength {
                expected: usize::MAX,
                actual: 0
            }
        );
    }

    #[test]
    fn test_rejects_four_channels() {
        let err = Image::zeros(2, 2, 4).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidChannelCount { actual: 4, .. }
        ));
    }

    #[test]
    fn test_map_planes_keeps_channel_order() {
        let img = Image::from_raw(1, 1, 3, vec![10, 20, 30]).unwrap();
        let doubled = img.map_planes(|p| p.mapv(|v| v * 2));
        assert_eq!(doubled.into_raw_vec(), vec![20, 40, 60]);
    }

    #[test]
    fn test_gray_image_roundtrip() {
        let img = Image::from_gray(array![[0u8, 50], [100, 150], [200, 250]]);
        let gray = img.to_gray_image().unwrap();
        assert_eq!(gray.dimensions(), (2, 3));
        assert_eq!(gray.get_pixel(1, 2)[0], 250);
        assert_eq!(Image::from(gray), img);
    }

    #[test]
    fn test_to_rgb_requires_three_channels() {
        let img = Image::from_gray(array![[1u8]]);
        assert!(img.to_rgb_image().is_err());
    }
}
