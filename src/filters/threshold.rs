//! Binarization: global fixed threshold and local adaptive-mean threshold.
//!
//! Output samples are always 0 or 255. A sample becomes 255 only when it is
//! strictly greater than its threshold.

use ndarray::{Array2, ArrayView2, Zip};

use crate::buffer::Image;
use crate::error::{FilterError, Result};
use crate::filters::convolution::{source_index, BoundaryMode};

#[inline]
fn binarize(above: bool) -> u8 {
    if above {
        255
    } else {
        0
    }
}

/// Global threshold, applied element-wise to every channel.
///
/// # Arguments
/// * `image` - Image with 1 or 3 channels
/// * `threshold` - Samples strictly above this become 255
///
/// # Returns
/// Binary image with the input's shape
pub fn global_threshold(image: &Image, threshold: u8) -> Image {
    log::debug!("global_threshold: shape={:?} t={}", image.shape(), threshold);
    image.map_planes(|plane| plane.mapv(|v| binarize(v > threshold)))
}

/// Summed-area table of the edge-replicated plane, padded by `pad` on every
/// side. Entry `(y, x)` holds the sum of all padded samples above and left.
fn padded_integral(plane: ArrayView2<u8>, pad: usize) -> Array2<u64> {
    let (height, width) = plane.dim();
    let (padded_h, padded_w) = (height + 2 * pad, width + 2 * pad);
    let rows: Vec<usize> = (0..padded_h)
        .filter_map(|y| source_index(y as isize - pad as isize, height, BoundaryMode::Replicate))
        .collect();
    let cols: Vec<usize> = (0..padded_w)
        .filter_map(|x| source_index(x as isize - pad as isize, width, BoundaryMode::Replicate))
        .collect();

    let mut integral = Array2::<u64>::zeros((padded_h + 1, padded_w + 1));
    for (y, &sy) in rows.iter().enumerate() {
        let mut row_sum = 0u64;
        for (x, &sx) in cols.iter().enumerate() {
            row_sum += plane[[sy, sx]] as u64;
            integral[[y + 1, x + 1]] = integral[[y, x + 1]] + row_sum;
        }
    }
    integral
}

/// Local (adaptive) mean threshold on a grayscale image.
///
/// The image is padded by edge replication with `block_size / 2` on every
/// side; each pixel is compared against the mean of the `block_size x
/// block_size` block starting at its padded position, minus `c`.
///
/// # Arguments
/// * `image` - Grayscale image (height, width, 1)
/// * `block_size` - Neighborhood side length (>= 1)
/// * `c` - Constant subtracted from the local mean (0 for a plain mean)
///
/// # Returns
/// Binary image with the input's shape
pub fn local_threshold(image: &Image, block_size: usize, c: f64) -> Result<Image> {
    image.require_channels(1)?;
    if block_size == 0 {
        return Err(FilterError::InvalidKernelSize(block_size));
    }
    if !c.is_finite() {
        return Err(FilterError::invalid_parameter(
            "c",
            format!("must be finite, got {c}"),
        ));
    }
    log::debug!(
        "local_threshold: {}x{} block={} c={}",
        image.width(),
        image.height(),
        block_size,
        c
    );
    if image.width() == 0 || image.height() == 0 {
        return Ok(image.clone());
    }

    let area = (block_size * block_size) as f64;
    Ok(image.map_planes(|plane| {
        let integral = padded_integral(plane, block_size / 2);
        let mut output = Array2::<u8>::zeros(plane.dim());
        Zip::indexed(&mut output)
            .and(&plane)
            .par_for_each(|(y, x), out, &v| {
                let (y1, x1) = (y + block_size, x + block_size);
                let sum = integral[[y1, x1]] + integral[[y, x]] - integral[[y, x1]] - integral[[y1, x]];
                let mean = sum as f64 / area;
                *out = binarize(v as f64 > mean - c);
            });
        output
    }))
}
